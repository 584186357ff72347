//! Effect interpreter trait.
//!
//! The decision engine never talks HTTP directly. It hands effects to a
//! `GerritInterpreter`, which lets the same engine run against:
//! - the real review service (`crate::gerrit::GerritClient`)
//! - an in-memory fake in tests

use std::future::Future;

use super::gerrit::{GerritEffect, GerritResponse};

/// Interprets review-service effects.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockGerrit {
///     responses: HashMap<GerritEffect, GerritResponse>,
/// }
///
/// impl GerritInterpreter for MockGerrit {
///     type Error = anyhow::Error;
///
///     async fn interpret(&self, effect: GerritEffect) -> Result<GerritResponse, Self::Error> {
///         self.responses.get(&effect)
///             .cloned()
///             .ok_or_else(|| anyhow!("unexpected effect: {:?}", effect))
///     }
/// }
/// ```
pub trait GerritInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute an effect and return its response.
    fn interpret(
        &self,
        effect: GerritEffect,
    ) -> impl Future<Output = Result<GerritResponse, Self::Error>> + Send;
}

impl<T: GerritInterpreter + Sync> GerritInterpreter for &T {
    type Error = T::Error;

    fn interpret(
        &self,
        effect: GerritEffect,
    ) -> impl Future<Output = Result<GerritResponse, Self::Error>> + Send {
        (**self).interpret(effect)
    }
}
