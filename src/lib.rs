//! Core engine for a day-planner that keeps its data in plain markdown
//! notes. Parses time blocks out of a planner section, lays overlapping
//! blocks into fractional columns, applies interactive edits (drag,
//! resize, push, shrink) to an in-memory table, and writes the result
//! back as minimal line patches with undo.

pub mod edit;
pub mod io;
pub mod layout;
pub mod model;
pub mod parse;
pub mod patch;
