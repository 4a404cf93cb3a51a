//! Visual classification of tickets.
//!
//! Styles are applied as overlays in a fixed order, each replacing the
//! previous one outright:
//!
//! 1. blocked (outline only)
//! 2. unblocked, when no open included ticket blocks this one
//! 3. critical, when the priority is `critical`
//! 4. closed, when the status is `closed`
//!
//! So closed beats critical, critical beats unblocked, and a critical ticket
//! that is still blocked is drawn as critical.

use serde::Serialize;

use crate::model::Ticket;
use crate::options::{Options, StyleColors};

/// The four ways a ticket can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Blocked,
    Unblocked,
    Critical,
    Closed,
}

impl Classification {
    /// Legend entries, top to bottom.
    pub const LEGEND: [Self; 4] = [Self::Closed, Self::Unblocked, Self::Critical, Self::Blocked];

    /// Classify `ticket`; `blocked` says whether an open ticket blocks it.
    #[must_use]
    pub fn of(ticket: &Ticket, blocked: bool) -> Self {
        let mut class = Self::Blocked;
        if !blocked {
            class = Self::Unblocked;
        }
        if ticket.is_critical() {
            class = Self::Critical;
        }
        if ticket.is_closed() {
            class = Self::Closed;
        }
        class
    }

    /// Caption used in the legend.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Blocked => "Blocked",
            Self::Unblocked => "Unblocked",
            Self::Critical => "Critical",
            Self::Closed => "Closed",
        }
    }

    /// Legend node identifier.
    #[must_use]
    pub const fn legend_node(self) -> &'static str {
        match self {
            Self::Blocked => "legend_blocked",
            Self::Unblocked => "legend_unblocked",
            Self::Critical => "legend_critical",
            Self::Closed => "legend_closed",
        }
    }

    /// Attributes for this classification under `options`.
    #[must_use]
    pub fn style(self, options: &Options) -> NodeStyle {
        match self {
            Self::Blocked => NodeStyle::outline(&options.blocked),
            Self::Unblocked => NodeStyle::filled(&options.unblocked),
            Self::Critical => NodeStyle::filled(&options.critical),
            Self::Closed => NodeStyle::filled(&options.closed),
        }
    }
}

/// `color`, `fontcolor` and `style` attributes of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub color: String,
    pub fontcolor: String,
    pub filled: bool,
}

impl NodeStyle {
    fn outline(colors: &StyleColors) -> Self {
        Self {
            color: colors.color.clone(),
            fontcolor: colors.linkcolor.clone(),
            filled: false,
        }
    }

    fn filled(colors: &StyleColors) -> Self {
        Self {
            filled: true,
            ..Self::outline(colors)
        }
    }
}
