pub mod collision;
pub mod indexer;
pub mod results;
pub mod serialization;
pub mod tabular;
pub mod transmit;

pub use collision::{CollisionReader, IonCollisionReport};
pub use results::SrimResults;
pub use tabular::{OutputRecord, parse_output, read_output};
pub use transmit::{TransmittedRun, parse_transmitted, read_transmitted};
