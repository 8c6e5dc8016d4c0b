//! Compiled-in procedures that plugin files can bind commands to by symbol.

pub mod external;
pub mod plugins;
pub mod value;

use std::{collections::BTreeMap, sync::Arc};

use serde_json::Value;

use crate::dispatch::CommandContext;
use crate::registry::{Procedure, ProcedureResult};

/// Symbol table resolving `procedure = "<symbol>"` references.
#[derive(Clone, Default)]
pub struct ProcedureTable {
    symbols: BTreeMap<String, Procedure>,
}

impl ProcedureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding `echo`, `value` and `plugins`.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.define("echo", echo);
        table.define("value", value::run);
        table.define("plugins", plugins::run);
        table
    }

    /// Binds `symbol`, replacing any earlier definition.
    pub fn define<F>(&mut self, symbol: impl Into<String>, procedure: F)
    where
        F: Fn(&mut CommandContext<'_>, &[String]) -> ProcedureResult + Send + Sync + 'static,
    {
        self.symbols.insert(symbol.into(), Arc::new(procedure));
    }

    pub fn resolve(&self, symbol: &str) -> Option<Procedure> {
        self.symbols.get(symbol).cloned()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

/// Prints its arguments and returns them unchanged.
pub fn echo(ctx: &mut CommandContext<'_>, args: &[String]) -> ProcedureResult {
    ctx.println(args.join(" "))?;
    Ok(Some(Value::from(args.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_exposes_sample_symbols() {
        let table = ProcedureTable::standard();
        let symbols: Vec<&str> = table.symbols().collect();
        assert_eq!(symbols, vec!["echo", "plugins", "value"]);
        assert!(table.resolve("missing").is_none());
    }
}
