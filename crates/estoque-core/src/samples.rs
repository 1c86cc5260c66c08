//! Starter catalogue used by the "load samples" action and the seed binary.
//!
//! Five kitchenware items with retail prices in reais.

use crate::money::Money;
use crate::types::NewProduct;

/// Returns the sample products in display order.
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Panela de Pressão 5L", 15, Money::from_cents(18990)).with_description(
            "Panela de pressão antiaderente com capacidade para 5 litros, ideal para cozinhar para toda família.",
        ),
        NewProduct::new("Conjunto de Talheres", 8, Money::from_cents(12950)).with_description(
            "Conjunto com 24 peças em aço inox, incluindo facas, garfos e colheres.",
        ),
        NewProduct::new("Frigideira Antiaderente", 3, Money::from_cents(7990)).with_description(
            "Frigideira de 26cm com revestimento antiaderente e cabo ergonômico.",
        ),
        NewProduct::new("Jogo de Pratos", 12, Money::from_cents(9900))
            .with_description("Conjunto de 6 pratos rasos em porcelana branca."),
        NewProduct::new("Espátula de Silicone", 25, Money::from_cents(1590)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_new_product;

    #[test]
    fn test_samples_are_valid() {
        let samples = sample_products();
        assert_eq!(samples.len(), 5);
        for sample in &samples {
            assert!(validate_new_product(sample).is_ok(), "{}", sample.name);
        }
    }

    #[test]
    fn test_samples_include_a_low_stock_item() {
        assert!(sample_products()
            .iter()
            .any(|p| p.quantity <= crate::LOW_STOCK_THRESHOLD));
    }
}
