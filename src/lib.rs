// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile README automation.
//!
//! Plumage keeps a GitHub profile README looking fresh through two small
//! jobs that each run to completion and exit:
//!
//! 1. The __spotlight__ job ranks an account's repositories by recent
//!    activity, and rewrites a single marked line of the profile README
//!    to show off the busiest ones.
//! 2. The __animation__ job drives an external generator program that
//!    produces an SVG animation artifact for the profile.
//!
//! Both jobs leave scheduling, credentials, and the animation generator
//! itself to outside collaborators. Plumage only talks to them through
//! their public surfaces: the GitHub REST API, spawned processes, and
//! plain files.

pub mod animate;
pub mod config;
pub mod github;
pub mod path;
pub mod pipeline;
pub mod publish;
pub mod rank;
pub mod readme;
pub mod spotlight;
