//! Rules engine for 10×10 chess with three compound pieces: the archbishop
//! (knight + bishop), the chancellor (rook + knight) and the amazon (rook +
//! knight + bishop).
//!
//! The engine keeps the position, generates legal moves, detects check,
//! checkmate, stalemate and draws, and writes moves down in algebraic
//! notation. It does not choose moves.

pub mod chess;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the crate was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version and build information on startup.
pub fn print_engine_info() {
    println!("Decachess {}", engine_version());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
