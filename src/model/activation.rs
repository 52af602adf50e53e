//! Activation functions and their derivatives.
//!
//! The derivative is always expressed in terms of the *activated* value
//! `y = f(z)`, not the pre-activation sum `z`. Backpropagation only keeps the
//! activated outputs around, so e.g. the sigmoid derivative is `y * (1 - y)`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Error;

/// Scalar function applied element-wise to a layer's weighted sum
pub trait ActivationFunction: Send + Sync {
    /// `f(x)`
    fn value(&self, x: f64) -> f64;

    /// `f'` evaluated at the point whose activated output is `activated`
    fn derivative(&self, activated: f64) -> f64;

    fn name(&self) -> &str {
        "custom"
    }
}

/// Built-in activation functions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationKind {
    Sigmoid,
    Tanh,
    /// `f(x) = x`
    Identity,
    Relu,
    /// `max(0.01 x, x)`
    LeakyRelu,
}

const LEAKY_SLOPE: f64 = 0.01;

impl ActivationFunction for ActivationKind {
    fn value(&self, z: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => (1f64 + (-z).exp()).recip(),
            ActivationKind::Tanh => z.tanh(),
            ActivationKind::Identity => z,
            ActivationKind::Relu => z.max(0f64),
            ActivationKind::LeakyRelu => z.max(LEAKY_SLOPE * z),
        }
    }

    fn derivative(&self, y: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => y * (1f64 - y),
            ActivationKind::Tanh => 1f64 - y * y,
            ActivationKind::Identity => 1f64,
            ActivationKind::Relu => {
                if y > 0f64 {
                    1f64
                } else {
                    0f64
                }
            }
            ActivationKind::LeakyRelu => {
                if y > 0f64 {
                    1f64
                } else {
                    LEAKY_SLOPE
                }
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Tanh => "tanh",
            ActivationKind::Identity => "identity",
            ActivationKind::Relu => "relu",
            ActivationKind::LeakyRelu => "leaky-relu",
        }
    }
}

impl FromStr for ActivationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ActivationKind::Sigmoid),
            "tanh" => Ok(ActivationKind::Tanh),
            "identity" | "linear" => Ok(ActivationKind::Identity),
            "relu" => Ok(ActivationKind::Relu),
            "leaky-relu" | "leakyrelu" => Ok(ActivationKind::LeakyRelu),
            _ => Err(Error::ActivationType(s.to_owned())),
        }
    }
}

/// Activation built from a pair of caller supplied closures
pub struct FnActivation<F, D> {
    name: String,
    value: F,
    derivative: D,
}

impl<F, D> ActivationFunction for FnActivation<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64) -> f64 + Send + Sync,
{
    fn value(&self, x: f64) -> f64 {
        (self.value)(x)
    }

    fn derivative(&self, activated: f64) -> f64 {
        (self.derivative)(activated)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared handle to an activation function.
///
/// Cloning is cheap; every clone refers to the same function, so one
/// activation can be handed to several layers.
#[derive(Clone)]
pub struct Activation(Arc<dyn ActivationFunction>);

impl Activation {
    pub fn new<A: ActivationFunction + 'static>(function: A) -> Activation {
        Activation(Arc::new(function))
    }

    /// Build an activation from a value function and a derivative expressed
    /// in terms of the activated output.
    pub fn from_fns<F, D>(name: &str, value: F, derivative: D) -> Activation
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Activation::new(FnActivation {
            name: name.to_owned(),
            value,
            derivative,
        })
    }

    #[inline]
    pub fn value(&self, x: f64) -> f64 {
        self.0.value(x)
    }

    #[inline]
    pub fn derivative(&self, activated: f64) -> f64 {
        self.0.derivative(activated)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl<A: ActivationFunction + 'static> From<A> for Activation {
    fn from(function: A) -> Self {
        Activation::new(function)
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Activation").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closures_are_called_as_given() {
        let act = Activation::from_fns("square", |x| x * x, |y| 2.0 * y);
        assert_eq!(act.value(9.0), 81.0);
        assert_eq!(act.derivative(9.0), 18.0);
        assert_eq!(act.name(), "square");
    }

    #[test]
    fn sigmoid_derivative_uses_output() {
        let y = ActivationKind::Sigmoid.value(0.0);
        assert_relative_eq!(y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(ActivationKind::Sigmoid.derivative(y), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn tanh_derivative_uses_output() {
        let y = ActivationKind::Tanh.value(0.3);
        assert_relative_eq!(ActivationKind::Tanh.derivative(y), 1.0 - y * y, epsilon = 1e-12);
    }

    #[test]
    fn rectifiers() {
        assert_eq!(ActivationKind::Relu.value(-2.0), 0.0);
        assert_eq!(ActivationKind::Relu.value(3.0), 3.0);
        assert_eq!(ActivationKind::Relu.derivative(0.0), 0.0);
        assert_eq!(ActivationKind::LeakyRelu.value(-2.0), -0.02);
        assert_eq!(ActivationKind::LeakyRelu.derivative(-0.02), 0.01);
        assert_eq!(ActivationKind::LeakyRelu.derivative(3.0), 1.0);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Sigmoid".parse::<ActivationKind>().unwrap(), ActivationKind::Sigmoid);
        assert_eq!("linear".parse::<ActivationKind>().unwrap(), ActivationKind::Identity);
        assert!(matches!(
            "softmax".parse::<ActivationKind>(),
            Err(Error::ActivationType(_))
        ));
    }

    #[test]
    fn handles_share_one_function() {
        let act = Activation::from(ActivationKind::Tanh);
        let other = act.clone();
        assert_eq!(other.name(), "tanh");
        assert!(Arc::ptr_eq(&act.0, &other.0));
    }
}
