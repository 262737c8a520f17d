// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of topology construction and plan emission that must hold for
//! every valid input.

mod peering;
mod plan_ordering;
