pub mod lookup;
pub mod rig;
pub mod snapshot;
