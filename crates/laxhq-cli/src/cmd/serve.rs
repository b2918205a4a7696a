use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    laxhq_core::paths::require_initialized(root)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(laxhq_server::serve(root.to_path_buf(), port))
}
