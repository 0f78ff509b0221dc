use crate::args::ListArgs;
use crate::commands::{open_journal, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Category;
use crate::{render, Config, Result};

/// Adds a custom category. The name is trimmed and must not already exist.
pub async fn category_add(config: Config, name: &str) -> Result<Out<Category>> {
    let mut journal = open_journal(&config).await?;
    let category = journal
        .add_category(name)
        .await
        .pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("Added category '{}'", category.name()),
        category,
    ))
}

/// Lists every category, sorted by name.
pub async fn category_list(config: Config, args: ListArgs) -> Result<Out<Vec<Category>>> {
    let journal = open_journal(&config).await?;
    let categories = journal.categories_by_name();
    let display = render::categories(&categories, args.format).pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("Found {}", plural(categories.len(), "category", "categories")),
        categories,
    )
    .with_display(display))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Format;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_category_add_then_list() {
        let env = TestEnv::new().await;
        let out = category_add(env.config(), " Pets ").await.unwrap();
        assert_eq!(out.message(), "Added category 'Pets'");
        assert_eq!(out.structure().unwrap().id(), 8);

        let out = category_list(env.config(), ListArgs { format: Format::Json })
            .await
            .unwrap();
        let names: Vec<&str> = out.structure().unwrap().iter().map(Category::name).collect();
        assert_eq!(
            names,
            [
                "Entertainment",
                "Food",
                "Health",
                "Pets",
                "Rent",
                "Shopping",
                "Transport",
                "Utilities"
            ]
        );
        let parsed: Vec<Category> = serde_json::from_str(out.display().unwrap()).unwrap();
        assert_eq!(parsed.len(), 8);
    }

    #[tokio::test]
    async fn test_category_add_duplicate() {
        let env = TestEnv::new().await;
        let err = category_add(env.config(), "Food").await.unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }
}
