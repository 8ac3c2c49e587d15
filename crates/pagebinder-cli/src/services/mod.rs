// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command handlers to the pagebinder library
// crates.
//
// Each service turns command-line input (paths, flags, config files) into the
// values the library expects.

pub mod config_dir;
pub mod inputs;
pub mod options;
