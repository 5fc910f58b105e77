//! Typed service methods and their erased call form.
//!
//! Any `Fn(&mut S, A1, .., An) -> R` (n <= 6) with scalar arguments is a
//! [`ServiceMethod`]. The signature is read off the Rust types, so a route can
//! be checked against it once, at registration.

use std::sync::Arc;

use crate::service::value::{Scalar, ScalarKind, Value};

/// Error raised by a service method.
pub type Fault = Box<dyn std::error::Error + Send + Sync>;

/// Parameter and result kinds of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub parameters: Vec<ScalarKind>,
    pub result: ScalarKind,
}

/// Return types a service method may have.
///
/// Plain scalars and `()` are infallible; `Result<T, E>` surfaces `E` as a
/// lifecycle fault.
pub trait IntoOutcome {
    const KIND: ScalarKind;

    fn into_outcome(self) -> Result<Value, Fault>;
}

macro_rules! impl_into_outcome {
    ($($ty:ty),*) => {
        $(
            impl IntoOutcome for $ty {
                const KIND: ScalarKind = <$ty as Scalar>::KIND;

                fn into_outcome(self) -> Result<Value, Fault> {
                    Ok(self.into_value())
                }
            }
        )*
    };
}

impl_into_outcome!(String, i64, f64, bool, ());

impl<T, E> IntoOutcome for Result<T, E>
where
    T: Scalar,
    E: Into<Fault>,
{
    const KIND: ScalarKind = T::KIND;

    fn into_outcome(self) -> Result<Value, Fault> {
        self.map(Scalar::into_value).map_err(Into::into)
    }
}

/// A method callable on an instance of `S` with positional scalar arguments.
pub trait ServiceMethod<S, Args>: Send + Sync + 'static {
    fn signature(&self) -> Signature;

    fn call(&self, instance: &mut S, args: Vec<Value>) -> Result<Value, Fault>;
}

/// Type-erased method handle, resolved once per route.
pub(crate) type MethodCall<S> = Arc<dyn Fn(&mut S, Vec<Value>) -> Result<Value, Fault> + Send + Sync>;

fn argument_mismatch(position: usize) -> Fault {
    format!("argument {position} does not match the method signature").into()
}

macro_rules! impl_service_method {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<S, F, O, $($ty,)*> ServiceMethod<S, ($($ty,)*)> for F
        where
            F: Fn(&mut S, $($ty,)*) -> O + Send + Sync + 'static,
            O: IntoOutcome,
            $($ty: Scalar,)*
        {
            fn signature(&self) -> Signature {
                Signature {
                    parameters: vec![$(<$ty as Scalar>::KIND,)*],
                    result: O::KIND,
                }
            }

            fn call(&self, instance: &mut S, args: Vec<Value>) -> Result<Value, Fault> {
                let mut args = args.into_iter();
                let mut position = 0usize;
                $(
                    position += 1;
                    let $ty = args
                        .next()
                        .and_then(<$ty as Scalar>::from_value)
                        .ok_or_else(|| argument_mismatch(position))?;
                )*
                (self)(instance, $($ty,)*).into_outcome()
            }
        }
    };
}

impl_service_method!();
impl_service_method!(A1);
impl_service_method!(A1, A2);
impl_service_method!(A1, A2, A3);
impl_service_method!(A1, A2, A3, A4);
impl_service_method!(A1, A2, A3, A4, A5);
impl_service_method!(A1, A2, A3, A4, A5, A6);
