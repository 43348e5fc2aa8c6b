//! Retrieves information about the version of the crate from Git and the build
//! environment. It is accessed at runtime through the `build` module generated
//! by `shadow-rs`.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
