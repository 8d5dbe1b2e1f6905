// cvar.rs — dynamic variable tracking

use std::collections::HashMap;

use crate::common::com_printf;

/// Opaque index into a CvarContext, cached by subsystems at init time.
pub type CvarHandle = usize;

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
    pub integer: i32,
}

/// The full cvar system context. Threaded by reference through the
/// frame pipeline; there is no process-wide instance.
pub struct CvarContext {
    vars: Vec<Cvar>,
    /// O(1) cvar lookup by name -> index in vars
    index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Find a cvar by name. O(1) via HashMap.
    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.index.get(name).map(|&idx| &self.vars[idx])
    }

    /// Register a variable, returning a handle for cached access.
    /// If it already exists the existing value is kept and flags are
    /// OR'd in, matching how repeated registration behaves in the engine.
    pub fn register(&mut self, name: &str, value: &str, flags: i32) -> CvarHandle {
        if let Some(&idx) = self.index.get(name) {
            self.vars[idx].flags |= flags;
            return idx;
        }
        let idx = self.vars.len();
        self.vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            flags,
            modified: false,
            value: value.parse::<f32>().unwrap_or(0.0),
            integer: value.parse::<f32>().unwrap_or(0.0) as i32,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn value(&self, h: CvarHandle) -> f32 {
        self.vars[h].value
    }

    pub fn integer(&self, h: CvarHandle) -> i32 {
        self.vars[h].integer
    }

    pub fn string(&self, h: CvarHandle) -> &str {
        &self.vars[h].string
    }

    pub fn modified(&self, h: CvarHandle) -> bool {
        self.vars[h].modified
    }

    pub fn clear_modified(&mut self, h: CvarHandle) {
        self.vars[h].modified = false;
    }

    /// Get the floating-point value of a cvar by name. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        match self.find_var(name) {
            Some(var) => var.value,
            None => 0.0,
        }
    }

    /// Get the string value of a cvar by name. Returns "" if not found.
    pub fn variable_string(&self, name: &str) -> &str {
        match self.find_var(name) {
            Some(var) => &var.string,
            None => "",
        }
    }

    pub fn set_value(&mut self, h: CvarHandle, value: f32) {
        let string = if value == value as i32 as f32 {
            format!("{}", value as i32)
        } else {
            format!("{}", value)
        };
        self.set_string(h, &string);
    }

    pub fn set_string(&mut self, h: CvarHandle, value: &str) {
        let var = &mut self.vars[h];
        if var.string == value {
            return;
        }
        var.string = value.to_string();
        var.value = value.parse::<f32>().unwrap_or(0.0);
        var.integer = var.value as i32;
        var.modified = true;
    }

    /// Set by name; registers the variable if it doesn't exist yet.
    pub fn set(&mut self, name: &str, value: &str) -> CvarHandle {
        let h = self.register(name, value, 0);
        self.set_string(h, value);
        h
    }

    /// Names of all variables whose modified flag is set; clears the flags.
    pub fn check_modified(&mut self) -> Vec<String> {
        let mut changed = Vec::new();
        for var in self.vars.iter_mut() {
            if var.modified {
                changed.push(var.name.clone());
                var.modified = false;
            }
        }
        changed
    }

    /// Console "cvarlist" style dump.
    pub fn list(&self) {
        for var in &self.vars {
            com_printf(&format!("{:<24} \"{}\"\n", var.name, var.string));
        }
        com_printf(&format!("{} cvars\n", self.vars.len()));
    }
}

impl Default for CvarContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Tests
// ============================================================
