// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Text handling for free-form location names.
//!
//! Segmentation ([`tokenize`]) and normalization ([`normalize`]) are separate
//! pure steps: the tokenizer only splits, callers decide which fragments to
//! normalize and how.

pub mod normalize;
pub mod tokenizer;

pub use normalize::{normalize, strip_diacritics, transliterate};
pub use tokenizer::{is_code_token, tokenize, Fragments, MIN_FRAGMENT_LEN};
