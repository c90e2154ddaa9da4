//! Display types and their reuse identifiers.
//!
//! A display type names a concrete cell or header/footer implementation.
//! Grids keep one reuse pool per display type, keyed by a [`DisplayTypeId`]
//! derived from the Rust type itself, so registration and dequeueing can
//! never disagree about the identifier.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::cell::{FormCell, FormView};

/// A stable identifier for a concrete display type.
///
/// Equality and hashing use the type's `TypeId`; the type name is carried
/// along as the human-readable reuse identifier.
#[derive(Clone, Copy)]
pub struct DisplayTypeId {
    type_id: TypeId,
    name: &'static str,
}

impl DisplayTypeId {
    /// Returns the identifier for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The reuse identifier, i.e. the full type name.
    #[inline]
    pub fn reuse_identifier(&self) -> &'static str {
        self.name
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for DisplayTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DisplayTypeId {}

impl Hash for DisplayTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DisplayTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayTypeId({})", self.name)
    }
}

impl fmt::Display for DisplayTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Factory producing fresh cell instances for a reuse pool.
pub type CellFactory = Arc<dyn Fn() -> Box<dyn FormCell> + Send + Sync>;

/// Factory producing fresh header/footer instances for a reuse pool.
pub type ViewFactory = Arc<dyn Fn() -> Box<dyn FormView> + Send + Sync>;

/// A registrable cell type: its identifier plus a factory.
#[derive(Clone)]
pub struct CellType {
    id: DisplayTypeId,
    factory: CellFactory,
}

impl CellType {
    /// The cell type for `T`, instantiated with `T::default()`.
    pub fn of<T: FormCell + Default>() -> Self {
        Self::with_factory(T::default)
    }

    /// The cell type for `T`, instantiated by `factory`.
    pub fn with_factory<T, F>(factory: F) -> Self
    where
        T: FormCell,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            id: DisplayTypeId::of::<T>(),
            factory: Arc::new(move || Box::new(factory()) as Box<dyn FormCell>),
        }
    }

    /// The identifier of this cell type.
    #[inline]
    pub fn id(&self) -> DisplayTypeId {
        self.id
    }

    /// Creates a new, unbound instance.
    pub fn instantiate(&self) -> Box<dyn FormCell> {
        (self.factory)()
    }
}

impl fmt::Debug for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellType").field(&self.id.name).finish()
    }
}

/// A registrable header/footer view type: its identifier plus a factory.
#[derive(Clone)]
pub struct ViewType {
    id: DisplayTypeId,
    factory: ViewFactory,
}

impl ViewType {
    /// The view type for `T`, instantiated with `T::default()`.
    pub fn of<T: FormView + Default>() -> Self {
        Self::with_factory(T::default)
    }

    /// The view type for `T`, instantiated by `factory`.
    pub fn with_factory<T, F>(factory: F) -> Self
    where
        T: FormView,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            id: DisplayTypeId::of::<T>(),
            factory: Arc::new(move || Box::new(factory()) as Box<dyn FormView>),
        }
    }

    /// The identifier of this view type.
    #[inline]
    pub fn id(&self) -> DisplayTypeId {
        self.id
    }

    /// Creates a new, unbound instance.
    pub fn instantiate(&self) -> Box<dyn FormView> {
        (self.factory)()
    }
}

impl fmt::Debug for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewType").field(&self.id.name).finish()
    }
}
