pub mod books;

use std::sync::Arc;

use libris_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, catalog: Arc<books::BookCatalog>) {
    registry.register(books::create_module(catalog));
}
