//! In-process HTTP interception for testing.
//!
//! Routes outbound HTTP calls to in-process application handlers, selected
//! per request by host or URI matchers, with fall-through to the real
//! network transport for everything unmatched. Registrations are scoped:
//! the guard returned by [`Registry::register`] restores the previous
//! behavior when dropped, on every exit path.
//!
//! ```
//! use http_shunt::{AppRequest, AppResponse, BoxError, RegisterOptions, Registry, ShuntClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), http_shunt::Error> {
//! let registry = Registry::new();
//! let _guard = registry.register(
//!     |request: AppRequest| -> Result<AppResponse, BoxError> {
//!         Ok(AppResponse::ok(format!("ok:{}", request.path())))
//!     },
//!     RegisterOptions::new().host("api.example.com"),
//! )?;
//!
//! let client = ShuntClient::with_registry(registry);
//! let response = client.get("http://api.example.com/ping").await?;
//! assert_eq!(response.status(), 200);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod error;
pub mod registry;
pub mod routing;
pub mod transport;

pub use app::{AppHandler, AppRequest, AppResponse};
pub use error::{BoxError, Error};
pub use registry::{RegisterOptions, Registry, RegistryGuard};
pub use routing::matcher::{MatchRule, Regex};
pub use transport::{ShuntClient, ShuntLayer, ShuntService};

/// Register an override on the process-wide default registry.
pub fn register<H>(app: H, options: RegisterOptions) -> Result<RegistryGuard, Error>
where
    H: AppHandler + 'static,
{
    Registry::global().register(app, options)
}

/// Register a persistent override on the process-wide default registry.
pub fn install<H>(app: H, options: RegisterOptions) -> Result<(), Error>
where
    H: AppHandler + 'static,
{
    Registry::global().install(app, options)
}

/// Remove all overrides from the process-wide default registry. No-op when
/// nothing is registered.
pub fn unregister() {
    Registry::global().unregister();
}
