//! Member registration: the ordered capability table of a projected type.
//!
//! A type opts into projection by implementing [`Projected`], registering
//! each persistable member with a name, a wire order, and a typed accessor
//! pair. Registration fixes the member set; both formats and both
//! directions run off the same table.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{ProjectionError, Result};
use crate::value::{Value, ValueKind};

/// Order for members registered without a meaningful position; they sort
/// after every explicitly ordered member.
pub const ORDER_LAST: i32 = i32::MAX;

/// A type whose members can be projected to and from a stream.
///
/// `TYPE_NAME` names the block on the wire. `members()` builds the member
/// table; it is called afresh on every read or write, never cached.
pub trait Projected {
    /// Block name used in persisted output.
    const TYPE_NAME: &'static str;

    /// The member table, sorted ascending by declared order.
    fn members() -> MemberSet<Self>
    where
        Self: Sized;
}

/// Typed accessor pair for one member: the dispatch-table entry selected
/// by the member's kind at registration.
pub enum Accessor<T> {
    I8(fn(&T) -> i8, fn(&mut T, i8)),
    U8(fn(&T) -> u8, fn(&mut T, u8)),
    I16(fn(&T) -> i16, fn(&mut T, i16)),
    U16(fn(&T) -> u16, fn(&mut T, u16)),
    I32(fn(&T) -> i32, fn(&mut T, i32)),
    U32(fn(&T) -> u32, fn(&mut T, u32)),
    I64(fn(&T) -> i64, fn(&mut T, i64)),
    U64(fn(&T) -> u64, fn(&mut T, u64)),
    F32(fn(&T) -> f32, fn(&mut T, f32)),
    F64(fn(&T) -> f64, fn(&mut T, f64)),
    Decimal(fn(&T) -> Decimal, fn(&mut T, Decimal)),
    Bool(fn(&T) -> bool, fn(&mut T, bool)),
    String(fn(&T) -> String, fn(&mut T, String)),
    DateTime(fn(&T) -> DateTime<Utc>, fn(&mut T, DateTime<Utc>)),
}

// Derived impls would demand `T: Copy`; the variants hold only fn pointers.
impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

/// A native type usable as a member value.
///
/// Implemented for exactly the fixed primitive set; registration through
/// [`MemberSetBuilder::member`] is closed over these types.
pub trait MemberValue: Sized + 'static {
    /// Builds the dispatch entry for this kind.
    fn accessor<T>(get: fn(&T) -> Self, set: fn(&mut T, Self)) -> Accessor<T>;
}

macro_rules! member_value_impls {
    ($(($ty:ty, $variant:ident)),* $(,)?) => {
        $(
            impl MemberValue for $ty {
                fn accessor<T>(get: fn(&T) -> Self, set: fn(&mut T, Self)) -> Accessor<T> {
                    Accessor::$variant(get, set)
                }
            }
        )*
    };
}

member_value_impls! {
    (i8, I8),
    (u8, U8),
    (i16, I16),
    (u16, U16),
    (i32, I32),
    (u32, U32),
    (i64, I64),
    (u64, U64),
    (f32, F32),
    (f64, F64),
    (Decimal, Decimal),
    (bool, Bool),
    (String, String),
    (DateTime<Utc>, DateTime),
}

/// One registered member: name, order, and the typed accessor pair.
pub struct Member<T> {
    name: &'static str,
    order: i32,
    accessor: Accessor<T>,
}

impl<T> Member<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// The kind tag the accessor was registered under.
    pub fn kind(&self) -> ValueKind {
        match self.accessor {
            Accessor::I8(..) => ValueKind::I8,
            Accessor::U8(..) => ValueKind::U8,
            Accessor::I16(..) => ValueKind::I16,
            Accessor::U16(..) => ValueKind::U16,
            Accessor::I32(..) => ValueKind::I32,
            Accessor::U32(..) => ValueKind::U32,
            Accessor::I64(..) => ValueKind::I64,
            Accessor::U64(..) => ValueKind::U64,
            Accessor::F32(..) => ValueKind::F32,
            Accessor::F64(..) => ValueKind::F64,
            Accessor::Decimal(..) => ValueKind::Decimal,
            Accessor::Bool(..) => ValueKind::Bool,
            Accessor::String(..) => ValueKind::String,
            Accessor::DateTime(..) => ValueKind::DateTime,
        }
    }

    /// Reads the member's current value out of `target`.
    pub(crate) fn get(&self, target: &T) -> Value {
        match self.accessor {
            Accessor::I8(get, _) => Value::I8(get(target)),
            Accessor::U8(get, _) => Value::U8(get(target)),
            Accessor::I16(get, _) => Value::I16(get(target)),
            Accessor::U16(get, _) => Value::U16(get(target)),
            Accessor::I32(get, _) => Value::I32(get(target)),
            Accessor::U32(get, _) => Value::U32(get(target)),
            Accessor::I64(get, _) => Value::I64(get(target)),
            Accessor::U64(get, _) => Value::U64(get(target)),
            Accessor::F32(get, _) => Value::F32(get(target)),
            Accessor::F64(get, _) => Value::F64(get(target)),
            Accessor::Decimal(get, _) => Value::Decimal(get(target)),
            Accessor::Bool(get, _) => Value::Bool(get(target)),
            Accessor::String(get, _) => Value::String(get(target)),
            Accessor::DateTime(get, _) => Value::DateTime(get(target)),
        }
    }

    /// Writes a decoded value through the member's setter. Returns false
    /// when the value's kind does not match the registered kind.
    pub(crate) fn set(&self, target: &mut T, value: Value) -> bool {
        match (self.accessor, value) {
            (Accessor::I8(_, set), Value::I8(v)) => set(target, v),
            (Accessor::U8(_, set), Value::U8(v)) => set(target, v),
            (Accessor::I16(_, set), Value::I16(v)) => set(target, v),
            (Accessor::U16(_, set), Value::U16(v)) => set(target, v),
            (Accessor::I32(_, set), Value::I32(v)) => set(target, v),
            (Accessor::U32(_, set), Value::U32(v)) => set(target, v),
            (Accessor::I64(_, set), Value::I64(v)) => set(target, v),
            (Accessor::U64(_, set), Value::U64(v)) => set(target, v),
            (Accessor::F32(_, set), Value::F32(v)) => set(target, v),
            (Accessor::F64(_, set), Value::F64(v)) => set(target, v),
            (Accessor::Decimal(_, set), Value::Decimal(v)) => set(target, v),
            (Accessor::Bool(_, set), Value::Bool(v)) => set(target, v),
            (Accessor::String(_, set), Value::String(v)) => set(target, v),
            (Accessor::DateTime(_, set), Value::DateTime(v)) => set(target, v),
            _ => return false,
        }
        true
    }
}

/// The ordered member table of a projected type.
pub struct MemberSet<T> {
    members: Vec<Member<T>>,
}

impl<T> MemberSet<T> {
    /// Starts building a member table.
    pub fn builder() -> MemberSetBuilder<T> {
        MemberSetBuilder {
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Member<T>> {
        self.members.iter()
    }

    /// Rejects duplicate member names before the table touches a stream.
    pub(crate) fn check_unique(&self, type_name: &'static str) -> Result<()> {
        let mut seen = BTreeSet::new();
        for member in &self.members {
            if !seen.insert(member.name) {
                return Err(ProjectionError::DuplicateMember {
                    type_name,
                    name: member.name,
                });
            }
        }
        Ok(())
    }
}

/// Builder for a [`MemberSet`]; see [`Projected`].
pub struct MemberSetBuilder<T> {
    members: Vec<Member<T>>,
}

impl<T> MemberSetBuilder<T> {
    /// Registers one member.
    ///
    /// `order` fixes the member's on-wire position: ascending, with ties
    /// kept in registration order. Pass [`ORDER_LAST`] for members that
    /// should simply follow every ordered one.
    pub fn member<K: MemberValue>(
        mut self,
        name: &'static str,
        order: i32,
        get: fn(&T) -> K,
        set: fn(&mut T, K),
    ) -> Self {
        self.members.push(Member {
            name,
            order,
            accessor: K::accessor(get, set),
        });
        self
    }

    /// Finishes the table, applying the stable sort by order.
    pub fn build(mut self) -> MemberSet<T> {
        self.members.sort_by_key(Member::order);
        MemberSet {
            members: self.members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Sample {
        alpha: u8,
        beta: u8,
        gamma: u8,
    }

    fn table(first: (&'static str, i32), second: (&'static str, i32)) -> MemberSet<Sample> {
        MemberSet::builder()
            .member(first.0, first.1, |s: &Sample| s.alpha, |s, v| s.alpha = v)
            .member(second.0, second.1, |s: &Sample| s.beta, |s, v| s.beta = v)
            .build()
    }

    #[test]
    fn test_sort_by_declared_order() {
        let members = table(("alpha", 5), ("beta", 1));
        let names: Vec<_> = members.iter().map(Member::name).collect();
        assert_eq!(names, ["beta", "alpha"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let members = table(("alpha", 3), ("beta", 3));
        let names: Vec<_> = members.iter().map(Member::name).collect();
        assert_eq!(names, ["alpha", "beta"]);
    }

    #[test]
    fn test_unordered_members_sort_last() {
        let members = MemberSet::builder()
            .member("gamma", ORDER_LAST, |s: &Sample| s.gamma, |s, v| {
                s.gamma = v;
            })
            .member("alpha", 9, |s: &Sample| s.alpha, |s, v| s.alpha = v)
            .build();
        let names: Vec<_> = members.iter().map(Member::name).collect();
        assert_eq!(names, ["alpha", "gamma"]);
    }

    #[test]
    fn test_check_unique_rejects_duplicates() {
        let members = table(("alpha", 0), ("alpha", 1));
        let err = members.check_unique("Sample").unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::DuplicateMember {
                type_name: "Sample",
                name: "alpha",
            }
        ));
    }

    #[test]
    fn test_accessor_roundtrip_and_mismatch() {
        let members = table(("alpha", 0), ("beta", 1));
        let mut sample = Sample::default();
        let member = members.iter().next().unwrap();

        assert!(member.set(&mut sample, Value::U8(42)));
        assert_eq!(sample.alpha, 42);
        assert_eq!(member.get(&sample), Value::U8(42));
        assert_eq!(member.kind(), ValueKind::U8);

        assert!(!member.set(&mut sample, Value::String("42".into())));
        assert_eq!(sample.alpha, 42);
    }
}
