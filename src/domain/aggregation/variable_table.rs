//! Full-table view of per-area variables.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{AreaId, Variable};

/// One row of variables per area, indexed by area id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableTable {
    /// Column names in procedure registration order.
    pub names: Vec<String>,
    rows: Vec<(AreaId, Vec<Variable>)>,
    #[serde(skip)]
    index: HashMap<AreaId, usize>,
}

impl VariableTable {
    pub fn new(names: Vec<String>, rows: Vec<(AreaId, Vec<Variable>)>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        Self { names, rows, index }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Variables for one area.
    pub fn row(&self, loc_id: &AreaId) -> Option<&[Variable]> {
        self.index.get(loc_id).map(|&i| self.rows[i].1.as_slice())
    }

    /// Value of the first variable named `name` for one area.
    pub fn value(&self, loc_id: &AreaId, name: &str) -> Option<f64> {
        self.row(loc_id)?
            .iter()
            .find(|v| v.name() == name)
            .map(Variable::value)
    }

    /// Area ids in row order.
    pub fn loc_ids(&self) -> impl Iterator<Item = &AreaId> {
        self.rows.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AreaId, &[Variable])> {
        self.rows.iter().map(|(id, vars)| (id, vars.as_slice()))
    }
}

impl PartialEq for VariableTable {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: &Variable, b: &Variable) -> bool {
            a.name() == b.name()
                && (a.value() == b.value() || (a.is_missing() && b.is_missing()))
        }
        self.names == other.names
            && self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|((ia, va), (ib, vb))| {
                ia == ib && va.len() == vb.len() && va.iter().zip(vb).all(|(a, b)| same(a, b))
            })
    }
}
