//! Call interceptor for a single callable member.

use std::fmt;

use qguard_core::{Args, Method, Reflect, Returned};

use crate::error::ProxyError;
use crate::holder::{Override, Proxy};

/// Result of invoking a method through a proxy.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<X> {
    /// Terminal text, returned unchanged.
    Text(String),
    /// The next link of the chain, re-wrapped by the proxy.
    Proxy(X),
}

impl<X> Outcome<X> {
    pub fn text(self) -> Option<String> {
        match self {
            Outcome::Text(text) => Some(text),
            Outcome::Proxy(_) => None,
        }
    }

    pub fn proxy(self) -> Option<X> {
        match self {
            Outcome::Proxy(next) => Some(next),
            Outcome::Text(_) => None,
        }
    }
}

enum Target<X: Proxy> {
    Forward(Method<X::Payload>),
    Intercept(Override<X>),
}

/// A callable member bound to the proxy it was resolved through.
pub struct PseudoMethod<'a, X: Proxy> {
    owner: &'a X,
    name: String,
    target: Target<X>,
}

impl<'a, X: Proxy> PseudoMethod<'a, X> {
    pub(crate) fn forwarded(owner: &'a X, name: &str, func: Method<X::Payload>) -> Self {
        Self {
            owner,
            name: name.to_string(),
            target: Target::Forward(func),
        }
    }

    pub(crate) fn intercepted(owner: &'a X, name: &str, func: Override<X>) -> Self {
        Self {
            owner,
            name: name.to_string(),
            target: Target::Intercept(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the proxy replaces this method instead of forwarding it.
    pub fn is_intercepted(&self) -> bool {
        matches!(self.target, Target::Intercept(_))
    }

    /// Call the method. Text results come back as-is; builder results go
    /// through the owner's redirect step.
    pub fn invoke(self, args: Args) -> Result<Outcome<X>, ProxyError> {
        match self.target {
            Target::Intercept(func) => func(self.owner, args),
            Target::Forward(func) => {
                let payload = self.owner.payload();
                tracing::trace!(
                    payload = payload.type_name(),
                    method = %self.name,
                    "forwarding call"
                );
                match func(payload, args)? {
                    Returned::Text(text) => Ok(Outcome::Text(text)),
                    Returned::Builder(next) => self.owner.redirect(next).map(Outcome::Proxy),
                }
            }
        }
    }
}

impl<X: Proxy> fmt::Debug for PseudoMethod<'_, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PseudoMethod<{}.{}>",
            self.owner.payload().type_name(),
            self.name
        )
    }
}
