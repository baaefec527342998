//! Widget system for the dashboard.
//!
//! This module defines the `Widget` trait that every dashboard panel
//! implements, the closed set of built-in [`WidgetKind`]s, and the
//! [`WidgetRegistry`] that maps stable widget ids to their title, sizing
//! rules and factory.
//!
//! # Architecture
//!
//! Widgets render themselves into the rectangle the grid assigns them. A
//! widget may fail; the grid host contains the failure so sibling panels
//! keep rendering. The registry is immutable after construction and is the
//! single source of sizing rules for the layout engine (it implements
//! [`dashboard_layout::Catalog`]).
//!
//! # Example
//!
//! ```
//! use widget_dashboard::widgets::WidgetRegistry;
//!
//! let registry = WidgetRegistry::builtin();
//! assert!(registry.get("claims").is_some());
//! assert!(registry.get("nonexistent").is_none());
//! assert_eq!(registry.list()[0].id, "claims");
//! ```

pub mod context;
pub mod panels;

pub use context::WidgetContext;

use std::collections::HashSet;

use dashboard_layout::{Catalog, Size, SizeConstraints};
use ratatui::{buffer::Buffer, layout::Rect};
use thiserror::Error;

/// Error a widget reports instead of drawing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct WidgetError {
    /// Description shown in the fallback panel.
    pub message: String,
}

impl WidgetError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while assembling a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two descriptors share an id.
    #[error("widget id registered twice: {0}")]
    DuplicateId(String),

    /// A descriptor's minimum exceeds its default or maximum.
    #[error("inconsistent sizing for widget {0}: min must not exceed default or max")]
    InconsistentSizing(String),

    /// A descriptor has an empty id.
    #[error("widget id must not be empty")]
    EmptyId,
}

/// Trait for dashboard widgets.
///
/// Widgets must be thread-safe (`Send + Sync`) so the registry can be
/// shared with background tasks.
pub trait Widget: Send + Sync {
    /// Draw into `area` of `buf`.
    ///
    /// Returning an error makes the host show a fallback panel in place of
    /// this widget. Whatever was drawn before the error is discarded.
    fn render(&self, area: Rect, buf: &mut Buffer, context: &WidgetContext)
        -> Result<(), WidgetError>;

    /// Stable identifier for this widget type.
    fn id(&self) -> &'static str;
}

/// Factory function type for creating widget instances.
pub type WidgetFactory = fn() -> Box<dyn Widget>;

/// Everything the dashboard knows about one widget type.
#[derive(Clone, Copy)]
pub struct WidgetDescriptor {
    /// Stable id used in persisted state.
    pub id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Sizing rules in grid units.
    pub sizing: SizeConstraints,
    /// Creates a fresh instance for rendering.
    pub factory: WidgetFactory,
}

impl std::fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sizing", &self.sizing)
            .finish_non_exhaustive()
    }
}

/// The built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Recent insurance claims.
    Claims,
    /// Period earnings with a trend line.
    Earnings,
    /// Partner firms.
    Firms,
    /// Local weather.
    Weather,
    /// Upcoming events.
    Calendar,
    /// Inbox preview.
    Messages,
    /// Compliance checklist.
    Compliance,
    /// Personal tasks.
    Tasks,
}

impl WidgetKind {
    /// All kinds in catalog order.
    pub const ALL: [WidgetKind; 8] = [
        WidgetKind::Claims,
        WidgetKind::Earnings,
        WidgetKind::Firms,
        WidgetKind::Weather,
        WidgetKind::Calendar,
        WidgetKind::Messages,
        WidgetKind::Compliance,
        WidgetKind::Tasks,
    ];

    /// Kinds shown on a first launch.
    pub const DEFAULT_ACTIVE: [WidgetKind; 4] = [
        WidgetKind::Claims,
        WidgetKind::Earnings,
        WidgetKind::Weather,
        WidgetKind::Tasks,
    ];

    /// Stable id used in persisted state.
    pub fn id(self) -> &'static str {
        match self {
            WidgetKind::Claims => "claims",
            WidgetKind::Earnings => "earnings",
            WidgetKind::Firms => "firms",
            WidgetKind::Weather => "weather",
            WidgetKind::Calendar => "calendar",
            WidgetKind::Messages => "messages",
            WidgetKind::Compliance => "compliance",
            WidgetKind::Tasks => "tasks",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            WidgetKind::Claims => "Claims",
            WidgetKind::Earnings => "Earnings",
            WidgetKind::Firms => "Firms",
            WidgetKind::Weather => "Weather",
            WidgetKind::Calendar => "Calendar",
            WidgetKind::Messages => "Messages",
            WidgetKind::Compliance => "Compliance",
            WidgetKind::Tasks => "Tasks",
        }
    }

    /// Sizing rules in grid units.
    pub fn sizing(self) -> SizeConstraints {
        let s = Size::new;
        match self {
            WidgetKind::Claims => SizeConstraints::new(s(6, 4), s(4, 3)),
            WidgetKind::Earnings => SizeConstraints::new(s(4, 3), s(3, 2)).with_max(s(6, 4)),
            WidgetKind::Firms => SizeConstraints::new(s(4, 4), s(3, 3)),
            WidgetKind::Weather => SizeConstraints::new(s(3, 3), s(2, 2)).with_max(s(4, 4)),
            WidgetKind::Calendar => SizeConstraints::new(s(4, 4), s(3, 3)),
            WidgetKind::Messages => SizeConstraints::new(s(4, 4), s(3, 3)),
            WidgetKind::Compliance => SizeConstraints::new(s(4, 3), s(3, 2)),
            WidgetKind::Tasks => SizeConstraints::new(s(6, 5), s(4, 3)),
        }
    }

    /// Factory producing the panel for this kind.
    pub fn factory(self) -> WidgetFactory {
        match self {
            WidgetKind::Claims => || Box::new(panels::ClaimsWidget),
            WidgetKind::Earnings => || Box::new(panels::EarningsWidget),
            WidgetKind::Firms => || Box::new(panels::FirmsWidget),
            WidgetKind::Weather => || Box::new(panels::WeatherWidget),
            WidgetKind::Calendar => || Box::new(panels::CalendarWidget),
            WidgetKind::Messages => || Box::new(panels::MessagesWidget),
            WidgetKind::Compliance => || Box::new(panels::ComplianceWidget),
            WidgetKind::Tasks => || Box::new(panels::TasksWidget),
        }
    }

    /// Registry entry for this kind.
    pub fn descriptor(self) -> WidgetDescriptor {
        WidgetDescriptor {
            id: self.id(),
            title: self.title(),
            sizing: self.sizing(),
            factory: self.factory(),
        }
    }

    /// Looks up a kind by its id.
    pub fn from_id(id: &str) -> Option<WidgetKind> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// Immutable catalog of widget types.
///
/// Order of [`list`](WidgetRegistry::list) is the registration order and
/// never changes for a given registry.
///
/// # Example
///
/// ```
/// use widget_dashboard::widgets::{WidgetKind, WidgetRegistry};
///
/// let registry = WidgetRegistry::builtin();
/// assert_eq!(registry.list().len(), WidgetKind::ALL.len());
/// assert!(registry.create("weather").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    descriptors: Vec<WidgetDescriptor>,
}

impl WidgetRegistry {
    /// Registry with every built-in kind.
    pub fn builtin() -> Self {
        Self {
            descriptors: WidgetKind::ALL.iter().map(|k| k.descriptor()).collect(),
        }
    }

    /// Registry from explicit descriptors.
    ///
    /// # Errors
    ///
    /// Rejects empty or duplicate ids and sizing whose minimum exceeds the
    /// default or maximum.
    pub fn from_descriptors(descriptors: Vec<WidgetDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        for d in &descriptors {
            if d.id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if !seen.insert(d.id) {
                return Err(RegistryError::DuplicateId(d.id.to_string()));
            }
            if !d.sizing.is_consistent() {
                return Err(RegistryError::InconsistentSizing(d.id.to_string()));
            }
        }
        Ok(Self { descriptors })
    }

    /// Descriptor for `id`, or `None` if unknown.
    pub fn get(&self, id: &str) -> Option<&WidgetDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> &[WidgetDescriptor] {
        &self.descriptors
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Create a widget instance by identifier.
    ///
    /// Returns `None` if no widget is registered for the given id.
    pub fn create(&self, id: &str) -> Option<Box<dyn Widget>> {
        self.get(id).map(|d| (d.factory)())
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog for WidgetRegistry {
    fn constraints(&self, widget_id: &str) -> Option<SizeConstraints> {
        self.get(widget_id).map(|d| d.sizing)
    }
}
