use crate::commands::Out;
use crate::model::CategoryRegistry;
use crate::{Config, Result};

/// Lists the categories that the configuration accepts.
pub async fn categories(config: &Config) -> Result<Out<Vec<String>>> {
    let labels: Vec<String> = config
        .categories()
        .labels()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Out::new(
        format!("{} categories are accepted", labels.len()),
        labels,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_CATEGORIES;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::create(&path, "abc123", "Gastos", None)
            .await
            .unwrap();

        let out = categories(&config).await.unwrap();
        let labels = out.structure().unwrap();
        assert_eq!(labels.len(), DEFAULT_CATEGORIES.len());
        assert!(labels.iter().any(|l| l == "Supermercado"));
    }
}
