//! Expense categories and the registry that decides which ones are accepted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// The category labels used by the household sheet.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Criptomonedas",
    "Fintual",
    "Agua",
    "Arriendo",
    "Gasto Común",
    "Internet",
    "Luz",
    "Almuerzo",
    "Comision BC",
    "Familia",
    "Farmacia",
    "Metro",
    "Otros",
    "Recreacional",
    "Regalos",
    "Ropa",
    "Supermercado",
    "Transporte",
    "Vacaciones",
    "Apps",
    "Eventos",
    "Electronica",
    "Hogar",
    "Limpieza",
    "Ingreso",
];

/// A read-only set of recognized category labels. Implementations must be safe to share between
/// concurrent requests.
pub trait CategoryRegistry: Debug + Send + Sync {
    /// Exact, case-sensitive membership.
    fn is_known(&self, category: &str) -> bool;

    /// All labels, for listing them back to the user.
    fn labels(&self) -> Vec<&str>;
}

/// A `CategoryRegistry` backed by a set of strings.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories {
    labels: BTreeSet<String>,
}

impl Categories {
    pub fn new<S, I>(labels: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES.iter().copied())
    }
}

impl CategoryRegistry for Categories {
    fn is_known(&self, category: &str) -> bool {
        self.labels.contains(category)
    }

    fn labels(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).collect()
    }
}
