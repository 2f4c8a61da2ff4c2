//! Dynamically typed ranking values.
//!
//! A ranking is generic over its value type, which is the right default,
//! but embedding hosts (scripting bridges, the C interface, heterogeneous
//! pipelines) need sequences whose element type is decided at runtime.
//! [`ErasedValue`] wraps any `Send + Sync` value behind `dyn Any`, and a
//! process-wide registry supplies equality, keyed by the concrete type.
//!
//! Equality is the delicate part: deduplication and observation-by-value
//! need it, but an erased type may not support it. The registry is seeded
//! with the built-in scalar and string types; anything else must be
//! registered with [`register_equality`]. Comparing two values of the same
//! unregistered type is a contract violation, reported at the point of
//! comparison (or eagerly by [`observe_erased_value`]). Values of
//! different erased types are simply unequal.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::ranking::{Deduplication, Ranking};

type EqFn = fn(&dyn Any, &dyn Any) -> bool;

fn eq_as<T: PartialEq + 'static>(lhs: &dyn Any, rhs: &dyn Any) -> bool {
    match (lhs.downcast_ref::<T>(), rhs.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn seed<T: PartialEq + Send + Sync + 'static>(map: &mut HashMap<TypeId, EqFn>) {
    map.insert(TypeId::of::<T>(), eq_as::<T>);
}

static EQUALITY_REGISTRY: Lazy<RwLock<HashMap<TypeId, EqFn>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    seed::<()>(&mut map);
    seed::<bool>(&mut map);
    seed::<char>(&mut map);
    seed::<i8>(&mut map);
    seed::<i16>(&mut map);
    seed::<i32>(&mut map);
    seed::<i64>(&mut map);
    seed::<i128>(&mut map);
    seed::<isize>(&mut map);
    seed::<u8>(&mut map);
    seed::<u16>(&mut map);
    seed::<u32>(&mut map);
    seed::<u64>(&mut map);
    seed::<u128>(&mut map);
    seed::<usize>(&mut map);
    seed::<f32>(&mut map);
    seed::<f64>(&mut map);
    seed::<String>(&mut map);
    seed::<&'static str>(&mut map);
    RwLock::new(map)
});

/// Register equality for `T`, enabling deduplication and
/// observation-by-value on erased sequences holding `T`.
///
/// Registration is idempotent and process-wide.
pub fn register_equality<T: PartialEq + Send + Sync + 'static>() {
    EQUALITY_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(TypeId::of::<T>(), eq_as::<T>);
}

/// A dynamically typed, shareable ranking value.
#[derive(Clone)]
pub struct ErasedValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ErasedValue {
    /// Erase `value`.
    pub fn new<T: Send + Sync + 'static>(value: T) -> ErasedValue {
        ErasedValue {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The name of the erased type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The [`TypeId`] of the erased type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.value.as_ref().type_id()
    }

    /// Borrow the value as a `T`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when the erased type is not `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Result<&T> {
        self.value.as_ref().downcast_ref::<T>().ok_or_else(|| {
            Error::invalid(format!(
                "erased value holds {}, not {}",
                self.type_name,
                std::any::type_name::<T>()
            ))
        })
    }

    /// Whether equality is registered for the erased type.
    #[must_use]
    pub fn is_comparable(&self) -> bool {
        EQUALITY_REGISTRY
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&self.type_id())
    }

    /// Compare two erased values.
    ///
    /// Values of different erased types are unequal.
    ///
    /// # Errors
    /// Returns [`Error::ContractViolation`] when both values share a type
    /// that has no registered equality.
    pub fn try_eq(&self, other: &ErasedValue) -> Result<bool> {
        if self.type_id() != other.type_id() {
            return Ok(false);
        }
        let registry = EQUALITY_REGISTRY
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match registry.get(&self.type_id()) {
            Some(eq) => Ok(eq(self.value.as_ref(), other.value.as_ref())),
            None => Err(Error::ContractViolation(format!(
                "no equality registered for {}",
                self.type_name
            ))),
        }
    }
}

/// Registry-backed equality. Values whose type has no registered
/// comparator are never equal under this impl; use
/// [`ErasedValue::try_eq`] (or the checked façade operations) to surface
/// the missing capability as an error instead.
impl PartialEq for ErasedValue {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Lift a typed ranking into an erased one, keeping its dedup flag.
pub fn erase<T: Clone + Send + Sync + 'static>(ranking: &Ranking<T>) -> Ranking<ErasedValue> {
    ranking.map(|value| Ok(ErasedValue::new(value.clone())), ranking.dedup())
}

/// Merge two erased rankings. Deduplication is forced off: across
/// heterogeneous element types, "consecutive equal values" is not a
/// meaningful notion.
#[must_use]
pub fn merge_erased(
    lhs: &Ranking<ErasedValue>,
    rhs: &Ranking<ErasedValue>,
) -> Ranking<ErasedValue> {
    lhs.merge(rhs, Deduplication::Disabled)
}

/// Condition an erased ranking on equality with `value`.
///
/// # Errors
/// Returns [`Error::ContractViolation`] eagerly when `value`'s type has no
/// registered equality; otherwise as [`Ranking::observe`].
pub fn observe_erased_value(
    ranking: &Ranking<ErasedValue>,
    value: &ErasedValue,
    dedup: Deduplication,
) -> Result<Ranking<ErasedValue>> {
    if !value.is_comparable() {
        return Err(Error::ContractViolation(format!(
            "no equality registered for {}",
            value.type_name()
        )));
    }
    let wanted = value.clone();
    ranking.observe(move |candidate| candidate.try_eq(&wanted), dedup)
}
