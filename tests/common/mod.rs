// Shared fixtures for osort integration tests
#![allow(dead_code)]

use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A model whose members are out of order.
pub const UNSORTED_MODEL: &str = indoc! {r#"
    from odoo import api, fields, models


    class SaleOrder(models.Model):
        name = fields.Char()
        _secret = fields.Char()

        def action_confirm(self):
            return True

        @api.depends("name")
        def _compute_total(self):
            for order in self:
                order.total = 0
"#};

/// `UNSORTED_MODEL` after sorting with the default configuration.
pub const SORTED_MODEL: &str = indoc! {r#"
    from odoo import api, fields, models


    class SaleOrder(models.Model):
        _secret = fields.Char()


        name = fields.Char()


        @api.depends("name")
        def _compute_total(self):
            for order in self:
                order.total = 0


        def action_confirm(self):
            return True
"#};

/// A model already in canonical order.
pub const CANONICAL_MODEL: &str = indoc! {r#"
    class ResPartner(models.Model):
        _inherit = "res.partner"

        vat_checked = fields.Boolean()

        def write(self, vals):
            return super().write(vals)
"#};

pub const BROKEN_MODEL: &str = "class Broken(models.Model:\n    name = fields.Char()\n";

/// Temporary project directory with helpers for writing files.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap()
    }
}
