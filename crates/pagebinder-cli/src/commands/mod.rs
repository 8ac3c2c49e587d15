// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers and the arguments they share.

pub mod convert;
pub mod inspect;
pub mod list;

use clap::{Args, ValueEnum};
use pagebinder_core::types::{SortCriterion, SortField};

/// Attribute to order images by.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortArg {
    /// Natural file-name order (img2 before img10).
    #[default]
    Name,
    /// Creation time, oldest first.
    Created,
    /// File size, smallest first.
    Size,
    /// File extension.
    Type,
}

impl From<SortArg> for SortField {
    fn from(v: SortArg) -> Self {
        match v {
            SortArg::Name => SortField::Name,
            SortArg::Created => SortField::CreationTime,
            SortArg::Size => SortField::SizeBytes,
            SortArg::Type => SortField::ExtensionType,
        }
    }
}

/// Ordering flags shared by `convert` and `list`.
#[derive(Args, Clone, Debug, Default)]
pub struct SortArgs {
    /// Order images by this attribute.
    #[arg(long, env = "PAGEBINDER_SORT", value_enum, default_value_t = SortArg::Name)]
    pub sort: SortArg,

    /// Reverse the final order.
    #[arg(long)]
    pub reverse: bool,
}

impl SortArgs {
    pub fn criterion(&self) -> SortCriterion {
        SortCriterion::new(self.sort.into()).reversed(self.reverse)
    }
}
