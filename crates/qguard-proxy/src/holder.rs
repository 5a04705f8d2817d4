//! Interception proxy: name-based forwarding to a wrapped object.
//!
//! [`Proxy`] mirrors the wrapped object's full interface through
//! [`Reflect::member`]; there is no allow-list. Implementors intercept
//! individual names with [`Proxy::intercept`] and decide how builder results are
//! re-wrapped with [`Proxy::redirect`].

use std::fmt;

use qguard_core::{Args, Member, Reflect, Value};

use crate::error::ProxyError;
use crate::pseudo::{Outcome, PseudoMethod};

/// A proxy-level replacement for one of the payload's methods.
pub type Override<X> = fn(&X, Args) -> Result<Outcome<X>, ProxyError>;

/// A member resolved through a proxy.
#[derive(Debug)]
pub enum Attr<'a, X: Proxy> {
    /// A data member, returned unchanged.
    Value(Value),
    /// A callable member, wrapped in a call interceptor.
    Method(PseudoMethod<'a, X>),
}

impl<X: Proxy> Attr<'_, X> {
    pub fn is_callable(&self) -> bool {
        matches!(self, Attr::Method(_))
    }
}

/// A wrapper that forwards member access to a payload.
pub trait Proxy: Sized {
    type Payload: Reflect;

    fn payload(&self) -> &Self::Payload;

    /// Wrap a builder returned by a forwarded call.
    ///
    /// The default refuses: a proxy that never supplies a redirect step cannot
    /// keep a fluent chain intercepted.
    fn redirect(&self, result: Self::Payload) -> Result<Self, ProxyError> {
        let _ = result;
        Err(ProxyError::RedirectNotImplemented {
            proxy: std::any::type_name::<Self>(),
        })
    }

    /// Methods the proxy answers itself instead of forwarding.
    fn intercept(&self, name: &str) -> Option<Override<Self>> {
        let _ = name;
        None
    }

    /// Resolve `name` on the proxy, then on the payload.
    fn attr(&self, name: &str) -> Result<Attr<'_, Self>, ProxyError> {
        if let Some(func) = self.intercept(name) {
            return Ok(Attr::Method(PseudoMethod::intercepted(self, name, func)));
        }
        match self.payload().member(name) {
            Some(Member::Field(value)) => Ok(Attr::Value(value)),
            Some(Member::Method(func)) => Ok(Attr::Method(PseudoMethod::forwarded(self, name, func))),
            None => {
                let type_name = self.payload().type_name();
                tracing::debug!(payload = type_name, member = name, "unknown member");
                Err(ProxyError::UnknownMember {
                    type_name,
                    name: name.to_string(),
                })
            }
        }
    }

    /// Invoke the method `name` with `args`.
    fn call(&self, name: &str, args: Args) -> Result<Outcome<Self>, ProxyError> {
        match self.attr(name)? {
            Attr::Method(method) => method.invoke(args),
            Attr::Value(_) => Err(ProxyError::NotCallable {
                type_name: self.payload().type_name(),
                name: name.to_string(),
            }),
        }
    }

    /// Invoke a method that continues the chain.
    fn chain(&self, name: &str, args: Args) -> Result<Self, ProxyError> {
        match self.call(name, args)? {
            Outcome::Proxy(next) => Ok(next),
            Outcome::Text(_) => Err(ProxyError::UnexpectedOutcome {
                method: name.to_string(),
                expected: "a proxy",
                found: "text",
            }),
        }
    }

    /// Invoke a method that ends the chain with text.
    fn resolve(&self, name: &str, args: Args) -> Result<String, ProxyError> {
        match self.call(name, args)? {
            Outcome::Text(text) => Ok(text),
            Outcome::Proxy(_) => Err(ProxyError::UnexpectedOutcome {
                method: name.to_string(),
                expected: "text",
                found: "a proxy",
            }),
        }
    }
}

/// The plain interception proxy: forwards everything, re-wraps builders in a
/// new `Holder`.
pub struct Holder<P> {
    payload: P,
}

impl<P: Reflect> Holder<P> {
    pub fn new(payload: P) -> Self {
        Self { payload }
    }

    pub fn into_inner(self) -> P {
        self.payload
    }
}

impl<P: Reflect> Proxy for Holder<P> {
    type Payload = P;

    fn payload(&self) -> &P {
        &self.payload
    }

    fn redirect(&self, result: P) -> Result<Self, ProxyError> {
        Ok(Holder::new(result))
    }
}

impl<P: Reflect> fmt::Display for Holder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.payload, f)
    }
}

impl<P: Reflect> fmt::Debug for Holder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.payload, f)
    }
}
