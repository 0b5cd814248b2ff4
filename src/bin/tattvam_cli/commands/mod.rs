// ABOUTME: Re-exports command modules for tattvam-cli
// ABOUTME: Product lookup and analysis, catalog review, and scan history commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod catalog;
pub mod product;
pub mod scans;
