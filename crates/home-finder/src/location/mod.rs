//! Location validation: the shared rule set, the line-oriented TCP channel
//! the validation service speaks, and the `LocationValidator` capability the
//! client selects at startup.

mod channel;
mod domain;
mod protocol;
mod rules;
mod server;
mod validator;

pub use channel::{ChannelError, ValidationChannel};
pub use domain::{Location, ValidationOutcome};
pub use protocol::{ChannelMessage, ShutdownAck, ValidationRequest, ValidationResponse, SHUTDOWN_SENTINEL};
pub use rules::{
    validate_city, validate_location, validate_state, LocationRuleError, MAX_CITY_LEN,
    MIN_CITY_LEN, STATE_CODES,
};
pub use server::ValidationServer;
pub use validator::{
    connect_validator, LocalValidator, LocationValidator, RemoteValidator, SharedValidator,
};
