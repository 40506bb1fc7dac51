// src/common/id_gen.rs

// Geração de identificadores sequenciais ("B047", "WC012", "O0001").
// O próximo ID sempre vem do maior sufixo já gravado no banco, nunca de um
// contador em memória.

use serde::Serialize;

use crate::common::error::AppError;

/// Maior sufixo numérico aceito. Mantém `max + 1` longe do limite de `u64`
/// e barra IDs absurdos vindos do rename.
pub const MAX_SUFFIX_DIGITS: usize = 9;
const MAX_SUFFIX: u64 = 999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntityKind {
    Part,
    Bom,
    Routing,
    Workcentre,
    Order,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Part => "P",
            EntityKind::Bom => "B",
            EntityKind::Routing => "R",
            EntityKind::Workcentre => "WC",
            EntityKind::Order => "O",
        }
    }

    /// Quantidade mínima de dígitos do sufixo.
    pub fn width(self) -> usize {
        match self {
            EntityKind::Order => 4,
            _ => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Part => "Part",
            EntityKind::Bom => "BOM",
            EntityKind::Routing => "Routing",
            EntityKind::Workcentre => "Workcentre",
            EntityKind::Order => "Order",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Part => "parts",
            EntityKind::Bom => "bom",
            EntityKind::Routing => "routings",
            EntityKind::Workcentre => "workcentres",
            EntityKind::Order => "orders",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            EntityKind::Part => "part_id",
            EntityKind::Bom => "bom_id",
            EntityKind::Routing => "routing_id",
            EntityKind::Workcentre => "workcentre_id",
            EntityKind::Order => "order_id",
        }
    }

    /// Colunas da chave natural: identificam o "mesmo" registro entre versões.
    /// Pedidos não são versionados.
    pub fn natural_key_columns(self) -> &'static [&'static str] {
        match self {
            EntityKind::Part => &["part_name"],
            EntityKind::Bom => &["parent_id"],
            EntityKind::Routing => &["bom_id", "operation_seq"],
            EntityKind::Workcentre => &["workcentre_name"],
            EntityKind::Order => &[],
        }
    }

    /// Chave do advisory lock do Postgres que serializa as escritas deste tipo.
    pub fn lock_key(self) -> i64 {
        // Espaço próprio ("BOM\0" em ASCII) para não colidir com outros locks.
        0x424F_4D00_0000_0000 + self as i64
    }

    /// Extrai o sufixo numérico de um ID deste tipo. IDs fora do formato
    /// (ou com mais de `MAX_SUFFIX_DIGITS` dígitos) retornam `None`.
    pub fn parse_suffix(self, id: &str) -> Option<u64> {
        let digits = id.strip_prefix(self.prefix())?;
        if digits.is_empty()
            || digits.len() > MAX_SUFFIX_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok()
    }

    pub fn is_valid_id(self, id: &str) -> bool {
        self.parse_suffix(id).is_some()
    }

    pub fn format_id(self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix(), n, width = self.width())
    }

    /// Calcula o próximo ID a partir dos IDs existentes, em qualquer ordem.
    /// Falha quando a faixa de sufixos do tipo se esgota.
    pub fn next_id<I, S>(self, existing: I) -> Result<String, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let max = existing
            .into_iter()
            .filter_map(|id| self.parse_suffix(id.as_ref()))
            .max()
            .unwrap_or(0);
        match max.checked_add(1) {
            Some(next) if next <= MAX_SUFFIX => Ok(self.format_id(next)),
            _ => Err(AppError::IntegrityViolation(format!(
                "não há mais IDs disponíveis para {}",
                self.label()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn next_after_nine_is_ten() {
        let ids: Vec<String> = (1..=9).map(|n| format!("B{n:03}")).collect();
        assert_eq!(EntityKind::Bom.next_id(&ids).unwrap(), "B010");
    }

    #[test]
    fn scan_order_does_not_matter() {
        let ids = ["B004", "B009", "B001", "B007"];
        assert_eq!(EntityKind::Bom.next_id(ids).unwrap(), "B010");
        let reversed = ["B007", "B001", "B009", "B004"];
        assert_eq!(EntityKind::Bom.next_id(reversed).unwrap(), "B010");
    }

    #[test]
    fn empty_table_starts_at_one() {
        assert_eq!(EntityKind::Part.next_id(Vec::<String>::new()).unwrap(), "P001");
        assert_eq!(EntityKind::Order.next_id(Vec::<String>::new()).unwrap(), "O0001");
        assert_eq!(EntityKind::Workcentre.next_id(Vec::<String>::new()).unwrap(), "WC001");
    }

    #[test]
    fn gaps_are_not_reused() {
        assert_eq!(EntityKind::Routing.next_id(["R001", "R047"]).unwrap(), "R048");
    }

    #[test]
    fn malformed_ids_are_ignored() {
        let ids = ["P002", "PX99", "legacy", "P", "WC100"];
        assert_eq!(EntityKind::Part.next_id(ids).unwrap(), "P003");
    }

    #[test]
    fn suffix_grows_past_width() {
        assert_eq!(EntityKind::Bom.next_id(["B999"]).unwrap(), "B1000");
    }

    #[test]
    fn workcentre_prefix_has_two_letters() {
        assert_eq!(EntityKind::Workcentre.parse_suffix("WC012"), Some(12));
        assert_eq!(EntityKind::Workcentre.parse_suffix("W012"), None);
        assert!(!EntityKind::Part.is_valid_id("P-01"));
        assert!(EntityKind::Part.is_valid_id("P010"));
    }

    #[test]
    fn lock_keys_are_distinct() {
        let kinds = [
            EntityKind::Part,
            EntityKind::Bom,
            EntityKind::Routing,
            EntityKind::Workcentre,
            EntityKind::Order,
        ];
        let keys: HashSet<i64> = kinds.iter().map(|k| k.lock_key()).collect();
        assert_eq!(keys.len(), kinds.len());
    }

    #[test]
    fn oversized_suffix_is_not_an_id() {
        assert!(!EntityKind::Part.is_valid_id("P18446744073709551615"));
        assert!(!EntityKind::Part.is_valid_id("P1000000000"));
        assert!(EntityKind::Part.is_valid_id("P999999999"));

        // Um ID gigante já gravado não entra no cálculo do próximo.
        assert_eq!(
            EntityKind::Part.next_id(["P001", "P18446744073709551615"]).unwrap(),
            "P002"
        );
    }

    #[test]
    fn exhausted_range_is_an_error() {
        let err = EntityKind::Part.next_id(["P999999999"]).unwrap_err();
        assert!(matches!(err, AppError::IntegrityViolation(_)));
    }
}
