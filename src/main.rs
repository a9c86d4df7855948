/// Command line entry point for svifpod
///
/// This is a thin wrapper that delegates to the library crate.
fn main() -> anyhow::Result<()> {
    svifpod_lib::run()
}
