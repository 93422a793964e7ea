// src/settlement/roads.rs
//! Дорожная сеть между площадками
//!
//! Сеть растёт как дерево, по одной площадке за раз (аналог алгоритма Прима
//! на рёбрах с весом «число шагов по гексам»):
//!
//! 1. Центр города — площадка, ближайшая к центру карты
//! 2. Остальные площадки обрабатываются по возрастанию расстояния до центра
//! 3. Каждая соединяется с ближайшей уже подключённой площадкой кратчайшим
//!    маршрутом по сетке (A* из `petgraph`, эвристика — гексагональное расстояние)
//!
//! Все равенства разрешаются порядком координат (`r`, затем `q`), а граф
//! строится в каноническом порядке, поэтому результат не зависит от порядка
//! обхода хеш-таблиц.

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::grid::HexBounds;
use crate::hex::{HexCoord, hex_distance};

#[derive(Debug, Clone, PartialEq)]
pub struct RoadNetwork {
    pub bounds: HexBounds,
    /// Флаг дороги на каждый гекс, в каноническом порядке
    pub data: Vec<bool>,
    pub town_center: Option<HexCoord>,
    /// Маршруты в порядке прокладки, включая конечные площадки
    pub roads: Vec<Vec<HexCoord>>,
}

impl RoadNetwork {
    pub fn is_path(&self, coord: HexCoord) -> bool {
        self.bounds.index_of(coord).is_some_and(|i| self.data[i])
    }

    pub fn tile_count(&self) -> usize {
        self.data.iter().filter(|&&p| p).count()
    }
}

/// Граф смежности гексов; `NodeIndex` совпадает с плотным индексом [`HexBounds::index_of`]
pub fn build_hex_graph(bounds: HexBounds) -> UnGraph<HexCoord, ()> {
    let coords = bounds.coords();
    let mut graph = UnGraph::with_capacity(coords.len(), coords.len() * 3);
    for &c in &coords {
        graph.add_node(c);
    }

    for (i, &c) in coords.iter().enumerate() {
        for n in bounds.neighbors_in_bounds(c) {
            if let Some(j) = bounds.index_of(n) {
                // Каждое ребро добавляется один раз, от меньшего индекса
                if j > i {
                    graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }
    }
    graph
}

/// Центр города: площадка, ближайшая к центру карты
pub fn pick_town_center(bounds: HexBounds, sites: &[HexCoord]) -> Option<HexCoord> {
    let center = bounds.center();
    sites
        .iter()
        .copied()
        .min_by_key(|&s| (hex_distance(s, center), s))
}

/// Кратчайший маршрут между двумя гексами, включая оба конца
pub fn shortest_walk(
    graph: &UnGraph<HexCoord, ()>,
    bounds: HexBounds,
    from: HexCoord,
    to: HexCoord,
) -> Option<Vec<HexCoord>> {
    let start = NodeIndex::new(bounds.index_of(from)?);
    let goal = NodeIndex::new(bounds.index_of(to)?);

    let (_, route) = astar(
        graph,
        start,
        |n| n == goal,
        |_| 1u32,
        |n| hex_distance(graph[n], to),
    )?;
    Some(route.into_iter().map(|n| graph[n]).collect())
}

/// Соединяет площадки дорожной сетью
pub fn connect_sites(bounds: HexBounds, sites: &[HexCoord]) -> RoadNetwork {
    let mut network = RoadNetwork {
        bounds,
        data: vec![false; bounds.tile_count()],
        town_center: pick_town_center(bounds, sites),
        roads: Vec::new(),
    };
    let Some(town) = network.town_center else {
        return network;
    };

    let graph = build_hex_graph(bounds);

    let mut pending: Vec<HexCoord> = sites.iter().copied().filter(|&s| s != town).collect();
    pending.sort_by_key(|&s| (hex_distance(s, town), s));

    let mut connected = vec![town];
    for site in pending {
        let Some(&target) = connected
            .iter()
            .min_by_key(|&&c| (hex_distance(c, site), c))
        else {
            continue;
        };

        match shortest_walk(&graph, bounds, site, target) {
            Some(route) => {
                for &c in &route {
                    if let Some(i) = bounds.index_of(c) {
                        network.data[i] = true;
                    }
                }
                network.roads.push(route);
                connected.push(site);
            }
            None => log::warn!("no route from site {site} to {target}"),
        }
    }

    log::debug!(
        "roads: {} routes, {} path tiles, town center {town}",
        network.roads.len(),
        network.tile_count()
    );
    network
}
