use crate::catalog::TypeCatalog;
use crate::commands::CmdResult;
use crate::error::Result;

pub fn run(catalog: &TypeCatalog) -> Result<CmdResult> {
    let types = catalog.list().into_iter().cloned().collect();
    Ok(CmdResult::default().with_types(types))
}
