use crate::model::{ClimateSuitability, HybridRecord, YieldLevel};
use crate::store::traits::HybridStore;
use anyhow::Result;

/// Helper to build a seed row
fn cross(
    parent_a: &str,
    parent_b: &str,
    heat: u64,
    expected_yield: YieldLevel,
    climate: ClimateSuitability,
    flavor: &str,
) -> HybridRecord {
    HybridRecord::new(parent_a, parent_b, heat, expected_yield, climate, flavor)
}

/// Demonstration crosses used to populate an empty table.
pub fn demo_hybrids() -> Vec<HybridRecord> {
    use ClimateSuitability as C;
    use YieldLevel as Y;

    vec![
        cross("Carolina Reaper", "Habanero", 1_200_000, Y::High, C::High, "Smoky, Fruity"),
        cross("Trinidad Moruga Scorpion", "Scotch Bonnet", 1_000_000, Y::Medium, C::Medium, "Fruity, Floral"),
        cross("Bhut Jolokia", "Cayenne", 600_000, Y::High, C::High, "Earthy, Smoky"),
        cross("Aji Lemon", "Jalapeno", 40_000, Y::VeryHigh, C::High, "Citrus, Bright"),
        cross("Habanero", "Serrano", 150_000, Y::VeryHigh, C::High, "Fruity, Crisp"),
        cross("Rocoto", "Bhut Jolokia", 500_000, Y::Medium, C::Low, "Fruity, Earthy"),
        cross("Scotch Bonnet", "Thai Bird", 200_000, Y::High, C::Medium, "Sweet, Sharp"),
        cross("7 Pot Douglah", "Carolina Reaper", 1_600_000, Y::Low, C::Medium, "Smoky, Nutty"),
    ]
}

/// Insert the demonstration crosses, unless the table already has rows.
pub async fn load_seed_data<S: HybridStore + ?Sized>(store: &S) -> Result<usize> {
    if store.count_hybrids().await? > 0 {
        log::info!("Hybrids table already populated; skipping seed data");
        return Ok(0);
    }

    let hybrids = demo_hybrids();
    for hybrid in &hybrids {
        store.insert_hybrid(hybrid).await?;
    }
    Ok(hybrids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[tokio::test]
    async fn test_seed_only_fills_empty_table() {
        let store = SqliteStore::in_memory().await.unwrap();

        let inserted = load_seed_data(&store).await.unwrap();
        assert_eq!(inserted, demo_hybrids().len());

        let again = load_seed_data(&store).await.unwrap();
        assert_eq!(again, 0);
        assert_eq!(store.count_hybrids().await.unwrap() as usize, demo_hybrids().len());
    }
}
