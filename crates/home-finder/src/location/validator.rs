use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::channel::ValidationChannel;
use super::domain::ValidationOutcome;
use super::protocol::ValidationRequest;
use super::rules::validate_location;
use crate::config::ServerConfig;

/// Capability the session uses to check a location.
pub trait LocationValidator {
    fn validate(&mut self, city: &str, state: &str) -> ValidationOutcome;

    /// Releases any held resources. Called once when the session ends.
    fn shutdown(&mut self) {}

    fn mode(&self) -> &'static str;
}

impl<T: LocationValidator + ?Sized> LocationValidator for Box<T> {
    fn validate(&mut self, city: &str, state: &str) -> ValidationOutcome {
        (**self).validate(city, state)
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }

    fn mode(&self) -> &'static str {
        (**self).mode()
    }
}

/// In-process rule set.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalValidator;

impl LocationValidator for LocalValidator {
    fn validate(&mut self, city: &str, state: &str) -> ValidationOutcome {
        validate_location(city, state)
    }

    fn mode(&self) -> &'static str {
        "local"
    }
}

/// Validation through the remote service. The first channel failure closes
/// the channel and every later call is answered by the local rules.
#[derive(Debug)]
pub struct RemoteValidator {
    channel: Option<ValidationChannel>,
    fallback: LocalValidator,
}

impl RemoteValidator {
    pub fn new(channel: ValidationChannel) -> Self {
        Self {
            channel: Some(channel),
            fallback: LocalValidator,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }
}

impl LocationValidator for RemoteValidator {
    fn validate(&mut self, city: &str, state: &str) -> ValidationOutcome {
        let Some(channel) = self.channel.as_mut() else {
            debug!("validation channel closed; using local rules");
            return self.fallback.validate(city, state);
        };

        match channel.request(&ValidationRequest::new(city, state)) {
            Ok(response) => response.into_outcome(),
            Err(err) => {
                warn!(error = %err, "validation service call failed; falling back to local rules");
                self.channel = None;
                self.fallback.validate(city, state)
            }
        }
    }

    fn shutdown(&mut self) {
        let Some(channel) = self.channel.take() else {
            return;
        };

        match channel.shutdown() {
            Ok(ack) => debug!(
                acknowledged = ack.acknowledged,
                "validation service shutdown handshake completed"
            ),
            Err(err) => debug!(error = %err, "validation service shutdown handshake failed"),
        }
    }

    fn mode(&self) -> &'static str {
        if self.is_connected() {
            "remote"
        } else {
            "local"
        }
    }
}

/// Validator handle shared between the session and the interrupt listener.
/// Whichever clone shuts down first releases the wrapped validator; later
/// calls are no-ops and validation continues on the local rules.
#[derive(Clone)]
pub struct SharedValidator {
    inner: Arc<Mutex<SharedState>>,
}

struct SharedState {
    validator: Box<dyn LocationValidator + Send>,
    released: bool,
}

impl SharedValidator {
    pub fn new(validator: impl LocationValidator + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SharedState {
                validator: Box::new(validator),
                released: false,
            })),
        }
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationValidator for SharedValidator {
    fn validate(&mut self, city: &str, state: &str) -> ValidationOutcome {
        let mut guard = self.lock();
        if guard.released {
            return validate_location(city, state);
        }
        guard.validator.validate(city, state)
    }

    fn shutdown(&mut self) {
        let mut guard = self.lock();
        if guard.released {
            debug!("validator already released");
            return;
        }
        guard.released = true;
        guard.validator.shutdown();
    }

    fn mode(&self) -> &'static str {
        let guard = self.lock();
        if guard.released {
            "local"
        } else {
            guard.validator.mode()
        }
    }
}

/// Opens the validation channel once; degrades to local rules when the
/// service cannot be reached.
pub fn connect_validator(
    server: &ServerConfig,
    timeout: Duration,
) -> Box<dyn LocationValidator + Send> {
    let addr = match server.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            warn!(host = %server.host, error = %err, "invalid validation service address; using local rules");
            return Box::new(LocalValidator);
        }
    };

    match ValidationChannel::connect(addr, timeout) {
        Ok(channel) => {
            info!(%addr, "connected to location validation service");
            Box::new(RemoteValidator::new(channel))
        }
        Err(err) => {
            warn!(%addr, error = %err, "location validation service unavailable; using local rules");
            Box::new(LocalValidator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_validator_applies_rules() {
        let mut validator = LocalValidator;
        assert!(validator.validate("Seattle", "wa").is_valid());
        assert!(!validator.validate("S", "WA").is_valid());
        assert_eq!(validator.mode(), "local");
    }

    #[test]
    fn connect_falls_back_when_host_is_invalid() {
        let server = ServerConfig {
            host: "not an address".to_string(),
            port: 1,
        };
        let mut validator = connect_validator(&server, Duration::from_millis(200));
        assert_eq!(validator.mode(), "local");
        assert!(validator.validate("Portland", "OR").is_valid());
        validator.shutdown();
    }

    struct CountingValidator {
        shutdowns: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl LocationValidator for CountingValidator {
        fn validate(&mut self, _city: &str, _state: &str) -> ValidationOutcome {
            ValidationOutcome::Invalid {
                error: "rejected by counting validator".to_string(),
                suggestion: None,
            }
        }

        fn shutdown(&mut self) {
            self.shutdowns
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }

        fn mode(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn shared_validator_releases_inner_validator_once() {
        let shutdowns = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut session_side = SharedValidator::new(CountingValidator {
            shutdowns: shutdowns.clone(),
        });
        let mut interrupt_side = session_side.clone();

        assert_eq!(session_side.mode(), "counting");
        assert!(!session_side.validate("Seattle", "WA").is_valid());

        std::thread::spawn(move || interrupt_side.shutdown())
            .join()
            .expect("interrupt thread");
        session_side.shutdown();

        assert_eq!(shutdowns.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(session_side.is_released());
        assert_eq!(session_side.mode(), "local");
        assert!(session_side.validate("Seattle", "WA").is_valid());
    }
}
