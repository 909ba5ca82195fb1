mod nicehash;

pub use nicehash::{DEFAULT_API_URL, NiceHashWebApi};
