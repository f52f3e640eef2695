//! The deny-list visitor.
//!
//! `sqlparser`'s derived `Visit` walks every field of every node, so a
//! denied construct is reached however deeply it is nested (subqueries,
//! CASE arms, function arguments, INSERT sources).

use std::ops::ControlFlow;

use sqlparser::ast::{Expr, ObjectName, Statement, TableFactor, Visitor};

use crate::Rejection;

pub(crate) struct DenyList;

impl Visitor for DenyList {
  type Break = Rejection;

  fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<Rejection> {
    match statement {
      Statement::AttachDatabase { .. } | Statement::AttachDuckDBDatabase { .. } => {
        ControlFlow::Break(Rejection::Attach)
      }
      Statement::DetachDuckDBDatabase { .. } => ControlFlow::Break(Rejection::Detach),
      Statement::Pragma { .. } => ControlFlow::Break(Rejection::Pragma),
      _ => ControlFlow::Continue(()),
    }
  }

  fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Rejection> {
    match expr {
      Expr::Function(function) => check_function_name(&function.name),
      _ => ControlFlow::Continue(()),
    }
  }

  // `FROM f(...)` is a table factor, not an expression.
  fn pre_visit_table_factor(&mut self, table_factor: &TableFactor) -> ControlFlow<Rejection> {
    match table_factor {
      TableFactor::Table { name, args: Some(_), .. } => check_function_name(name),
      _ => ControlFlow::Continue(()),
    }
  }
}

fn check_function_name(name: &ObjectName) -> ControlFlow<Rejection> {
  let name = name.to_string();
  if name.to_ascii_lowercase().contains("extension") {
    ControlFlow::Break(Rejection::ExtensionCall { name })
  } else {
    ControlFlow::Continue(())
  }
}
