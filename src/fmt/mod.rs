//! Indented tree rendering of an [`Ast`], one node per line.
//!
//! ```text
//! select
//!   field id
//! from orders
//! where
//!   operator and
//!     operator =
//!       field status
//!       literal 'paid' : string
//! limit 10
//! ```

use crate::ast::{Ast, Operand, OperatorNode, SelectItem};
use std::fmt::{Result, Write};

#[cfg(test)]
mod tests;

pub struct Formatter {
    indent_level: usize,
    buffer: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    pub fn format(mut self, ast: &Ast) -> std::result::Result<String, std::fmt::Error> {
        self.visit_ast(ast)?;
        Ok(self.buffer)
    }

    fn indent(&mut self) -> Result {
        for _ in 0..self.indent_level {
            write!(self.buffer, "  ")?;
        }
        Ok(())
    }

    fn line(&mut self, text: impl std::fmt::Display) -> Result {
        self.indent()?;
        writeln!(self.buffer, "{}", text)
    }

    fn visit_ast(&mut self, ast: &Ast) -> Result {
        self.line("select")?;
        self.indent_level += 1;
        for item in &ast.select.columns {
            match item {
                SelectItem::Field(field) => self.line(format_args!("field {}", field))?,
                SelectItem::Aggregate(agg) => self.line(format_args!("aggregate {}", agg))?,
            }
        }
        self.indent_level -= 1;

        self.line(format_args!("from {}", ast.from.table))?;

        if let Some(where_clause) = &ast.where_clause {
            self.line("where")?;
            self.indent_level += 1;
            self.visit_operator(&where_clause.condition)?;
            self.indent_level -= 1;
        }

        for join in ast.joins.iter().flatten() {
            match &join.alias {
                Some(alias) => self.line(format_args!("join {} {} as {}", join.kind, join.table, alias))?,
                None => self.line(format_args!("join {} {}", join.kind, join.table))?,
            }
            self.indent_level += 1;
            self.line("on")?;
            self.indent_level += 1;
            self.visit_operator(&join.on)?;
            self.indent_level -= 2;
        }

        if let Some(group_by) = &ast.group_by {
            self.line("group_by")?;
            self.indent_level += 1;
            for field in &group_by.fields {
                self.line(format_args!("field {}", field))?;
            }
            self.indent_level -= 1;
        }

        if let Some(order_by) = &ast.order_by {
            self.line("order_by")?;
            self.indent_level += 1;
            for item in &order_by.items {
                self.line(format_args!("field {} {}", item.field, item.direction))?;
            }
            self.indent_level -= 1;
        }

        if let Some(limit) = &ast.limit {
            self.line(format_args!("limit {}", limit.value))?;
        }
        if let Some(offset) = &ast.offset {
            self.line(format_args!("offset {}", offset.value))?;
        }
        Ok(())
    }

    fn visit_operator(&mut self, node: &OperatorNode) -> Result {
        self.line(format_args!("operator {}", node.operator.symbol()))?;
        self.indent_level += 1;
        for operand in &node.operands {
            match operand {
                Operand::Operator(inner) => self.visit_operator(inner)?,
                Operand::Field(field) => self.line(format_args!("field {}", field))?,
                Operand::Literal(lit) => {
                    self.line(format_args!("literal {} : {}", lit.value, lit.data_type))?
                }
            }
        }
        self.indent_level -= 1;
        Ok(())
    }
}
