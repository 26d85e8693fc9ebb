use crate::reference::ServiceId;

/// Errors raised while producing or storing tracked services.
///
/// Selection errors never show up here: an unsupported or ambiguous
/// `(service, tracked)` pair does not compile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TrackerError {
    /// The tracked representation has no synthesized conversion from the
    /// service's canonical form.
    #[error("a custom customizer is required to track {service} as {tracked}")]
    CustomizerRequired { service: &'static str, tracked: &'static str },

    #[error("customizer failed for service {id}: {message}")]
    Customizer { id: ServiceId, message: String },

    #[error("invalid tracking config: {message}")]
    InvalidConfig { message: String },
}

impl TrackerError {
    /// Convenience constructor for `CustomizerRequired`.
    pub fn customizer_required<S: ?Sized, T: ?Sized>() -> Self {
        Self::CustomizerRequired {
            service: core::any::type_name::<S>(),
            tracked: core::any::type_name::<T>(),
        }
    }

    /// Convenience constructor for integrator failures inside `adding_service`.
    pub fn customizer(id: ServiceId, message: impl Into<String>) -> Self {
        Self::Customizer { id, message: message.into() }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Returns `true` for the unsupported-conversion fault.
    pub fn is_customizer_required(&self) -> bool {
        matches!(self, Self::CustomizerRequired { .. })
    }
}
