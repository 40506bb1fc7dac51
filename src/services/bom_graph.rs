// src/services/bom_graph.rs

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::bom::{BomEdge, ExplosionLine},
};

/// Lista de adjacência pai -> filhos montada a partir das arestas gravadas.
///
/// Os dados legados podem já conter ciclos; nenhuma travessia aqui depende
/// do grafo ser acíclico para terminar.
#[derive(Debug, Default)]
pub struct BomGraph {
    children: HashMap<String, Vec<String>>,
}

impl BomGraph {
    pub fn from_edges<I, P, C>(edges: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for (parent, child) in edges {
            children.entry(parent.into()).or_default().push(child.into());
        }
        Self { children }
    }

    pub fn contains_edge(&self, parent_id: &str, child_id: &str) -> bool {
        self.children
            .get(parent_id)
            .is_some_and(|kids| kids.iter().any(|k| k == child_id))
    }

    /// `true` se `parent_id` for alcançável a partir de `child_id`, ou seja,
    /// se a nova aresta fecharia um ciclo. Uma aresta de uma peça para ela
    /// mesma também é ciclo.
    pub fn would_create_cycle(&self, parent_id: &str, child_id: &str) -> bool {
        // DFS iterativa; `visited` vale para a chamada inteira, então cada nó
        // é expandido no máximo uma vez: O(V + E).
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![child_id];

        while let Some(current) = stack.pop() {
            if current == parent_id {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(kids) = self.children.get(current) {
                stack.extend(kids.iter().map(String::as_str));
            }
        }

        false
    }
}

/// As três checagens de uma nova aresta, nesta ordem: duplicidade, existência
/// das peças e ciclo. Nenhum efeito colateral.
pub fn check_new_edge(
    graph: &BomGraph,
    part_exists: impl Fn(&str) -> bool,
    parent_id: &str,
    child_id: &str,
) -> Result<(), AppError> {
    if graph.contains_edge(parent_id, child_id) {
        return Err(AppError::DuplicateRelationship {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
        });
    }

    for id in [parent_id, child_id] {
        if !part_exists(id) {
            return Err(AppError::missing_reference("Part", id));
        }
    }

    if graph.would_create_cycle(parent_id, child_id) {
        return Err(AppError::CircularDependency {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
        });
    }

    Ok(())
}

/// Explosão multinível da estrutura abaixo de `root`, em pré-ordem (filhos
/// ordenados por part_id). Uma aresta que volta para um ancestral do caminho
/// atual aparece uma vez e não é expandida.
pub fn explode<'a>(edges: &'a [BomEdge], root: &'a str) -> Vec<ExplosionLine> {
    let mut by_parent: HashMap<&str, Vec<&BomEdge>> = HashMap::new();
    for edge in edges {
        by_parent.entry(edge.parent_id.as_str()).or_default().push(edge);
    }
    for kids in by_parent.values_mut() {
        kids.sort_by(|a, b| a.child_id.cmp(&b.child_id));
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(&BomEdge, u32, Decimal, Vec<&str>)> = Vec::new();

    if let Some(kids) = by_parent.get(root) {
        for edge in kids.iter().rev() {
            stack.push((edge, 1, Decimal::ONE, vec![root]));
        }
    }

    while let Some((edge, level, multiplier, path)) = stack.pop() {
        let extended = multiplier * edge.child_quantity;
        lines.push(ExplosionLine {
            level,
            bom_id: edge.bom_id.clone(),
            parent_id: edge.parent_id.clone(),
            child_id: edge.child_id.clone(),
            quantity_per: edge.child_quantity,
            extended_quantity: extended,
        });

        let child = edge.child_id.as_str();
        if path.contains(&child) {
            tracing::warn!(
                "Ciclo encontrado na estrutura gravada: {} -> {} (BOM {})",
                edge.parent_id,
                edge.child_id,
                edge.bom_id
            );
            continue;
        }

        if let Some(kids) = by_parent.get(child) {
            let mut next_path = path.clone();
            next_path.push(child);
            for kid in kids.iter().rev() {
                stack.push((kid, level + 1, extended, next_path.clone()));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::RecordStatus;
    use chrono::Utc;

    fn graph(edges: &[(&str, &str)]) -> BomGraph {
        BomGraph::from_edges(edges.iter().copied())
    }

    fn edge(bom_id: &str, parent: &str, child: &str, qty: i64) -> BomEdge {
        BomEdge {
            bom_id: bom_id.into(),
            parent_id: parent.into(),
            child_id: child.into(),
            child_quantity: Decimal::from(qty),
            child_lead_time: 0,
            last_updated: Utc::now(),
            status: RecordStatus::Active,
        }
    }

    #[test]
    fn assembly_then_reverse_edge_is_a_cycle() {
        let parts = ["P001", "P002"];
        let exists = |id: &str| parts.contains(&id);

        let empty = graph(&[]);
        assert!(check_new_edge(&empty, exists, "P001", "P002").is_ok());

        let g = graph(&[("P001", "P002")]);
        let err = check_new_edge(&g, exists, "P002", "P001").unwrap_err();
        assert!(matches!(err, AppError::CircularDependency { .. }));
    }

    #[test]
    fn transitive_ancestor_is_detected() {
        let g = graph(&[("P001", "P002"), ("P002", "P003"), ("P003", "P004")]);
        assert!(g.would_create_cycle("P004", "P001"));
        assert!(g.would_create_cycle("P003", "P002"));
        assert!(!g.would_create_cycle("P001", "P004"));
        assert!(!g.would_create_cycle("P005", "P001"));
    }

    #[test]
    fn self_edge_is_a_cycle() {
        assert!(graph(&[]).would_create_cycle("P001", "P001"));
    }

    #[test]
    fn shared_components_are_not_cycles() {
        // Diamante: P002 e P003 usam o mesmo P004.
        let g = graph(&[("P001", "P002"), ("P001", "P003"), ("P002", "P004"), ("P003", "P004")]);
        assert!(!g.would_create_cycle("P001", "P004"));
        assert!(!g.would_create_cycle("P005", "P004"));
    }

    #[test]
    fn terminates_on_malformed_cyclic_data() {
        let g = graph(&[("P001", "P002"), ("P002", "P003"), ("P003", "P001"), ("P003", "P003")]);
        assert!(!g.would_create_cycle("P009", "P001"));
        assert!(g.would_create_cycle("P002", "P001"));
    }

    #[test]
    fn checks_run_in_order() {
        let exists = |id: &str| id != "P404";

        // Duplicidade antes de existência e ciclo.
        let g = graph(&[("P001", "P002")]);
        let err = check_new_edge(&g, exists, "P001", "P002").unwrap_err();
        assert!(matches!(err, AppError::DuplicateRelationship { .. }));

        // Existência antes de ciclo.
        let err = check_new_edge(&g, exists, "P404", "P404").unwrap_err();
        assert!(matches!(err, AppError::MissingReference { ref id, .. } if id == "P404"));

        let err = check_new_edge(&g, exists, "P001", "P404").unwrap_err();
        assert!(matches!(err, AppError::MissingReference { ref id, .. } if id == "P404"));
    }

    #[test]
    fn admits_iff_child_is_not_an_ancestor() {
        let edges = [("P001", "P002"), ("P002", "P003"), ("P001", "P004")];
        let g = graph(&edges);
        let parts = ["P001", "P002", "P003", "P004", "P005"];
        let exists = |id: &str| parts.contains(&id);

        for p in parts {
            for c in parts {
                let result = check_new_edge(&g, exists, p, c);
                let duplicate = edges.contains(&(p, c));
                let ancestor = p == c || g.would_create_cycle(p, c);
                assert_eq!(result.is_ok(), !duplicate && !ancestor, "{p} -> {c}");
            }
        }
    }

    #[test]
    fn explosion_multiplies_quantities_by_level() {
        let edges = vec![
            edge("B001", "P001", "P002", 2),
            edge("B002", "P002", "P003", 4),
            edge("B003", "P001", "P004", 1),
        ];
        let lines = explode(&edges, "P001");

        let summary: Vec<(u32, &str, Decimal)> = lines
            .iter()
            .map(|l| (l.level, l.child_id.as_str(), l.extended_quantity))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "P002", Decimal::from(2)),
                (2, "P003", Decimal::from(8)),
                (1, "P004", Decimal::from(1)),
            ]
        );
    }

    #[test]
    fn explosion_of_a_leaf_is_empty() {
        let edges = vec![edge("B001", "P001", "P002", 2)];
        assert!(explode(&edges, "P002").is_empty());
    }

    #[test]
    fn explosion_stops_at_stored_cycles() {
        let edges = vec![
            edge("B001", "P001", "P002", 1),
            edge("B002", "P002", "P001", 1),
        ];
        let lines = explode(&edges, "P001");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].child_id, "P001");
    }
}
