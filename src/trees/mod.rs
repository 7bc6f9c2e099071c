/// Greedy tree classifier
pub mod classifier;
/// Tree nodes and the nested-mapping export
pub mod node;
/// Training parameters
pub mod params;
/// Information-gain split scoring
pub mod split;
