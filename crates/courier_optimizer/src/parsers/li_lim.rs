use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};

use crate::{
    error::DataError,
    parsers::parser::DatasetParser,
    problem::{
        instance::{ProblemInstance, ProblemInstanceBuilder},
        location::{Location, LocationIdx},
        node::{Node, NodeId},
        request::{Request, RequestId},
        vehicle::{Vehicle, VehicleId},
    },
};

/// Reader for the Li & Lim PDPTW benchmark format.
///
/// Line 1 is `vehicleCount capacity speed`; line 2 the depot (id 0); every
/// further line a customer, all with nine whitespace-separated fields:
/// `id x y demand tw_early tw_late service pickupIdx deliveryIdx`.
/// A request is a customer with positive demand and a non-zero delivery
/// index. The depot is cloned into a private start/end pair per vehicle at
/// fresh ids above the largest customer id, and every vehicle starts out
/// compatible with every request.
pub struct LiLimParser;

impl DatasetParser for LiLimParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<ProblemInstance, DataError> {
        let content = std::fs::read_to_string(&file).map_err(|error| DataError::Malformed {
            line: 0,
            message: format!("cannot read {}: {error}", file.as_ref().display()),
        })?;
        parse(&content)
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeRow {
    id: usize,
    x: f64,
    y: f64,
    demand: f64,
    tw_early: f64,
    tw_late: f64,
    service: f64,
    delivery_index: usize,
}

fn parse_row(line_number: usize, line: &str) -> Result<NodeRow, DataError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 9 {
        return Err(DataError::Malformed {
            line: line_number,
            message: format!("expected 9 fields, got {}", fields.len()),
        });
    }

    let int = |index: usize| -> Result<usize, DataError> {
        fields[index].parse().map_err(|_| DataError::Malformed {
            line: line_number,
            message: format!("invalid integer `{}`", fields[index]),
        })
    };
    let real = |index: usize| -> Result<f64, DataError> {
        fields[index].parse().map_err(|_| DataError::Malformed {
            line: line_number,
            message: format!("invalid number `{}`", fields[index]),
        })
    };

    Ok(NodeRow {
        id: int(0)?,
        x: real(1)?,
        y: real(2)?,
        demand: real(3)?,
        tw_early: real(4)?,
        tw_late: real(5)?,
        service: real(6)?,
        delivery_index: int(8)?,
    })
}

pub fn parse(text: &str) -> Result<ProblemInstance, DataError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    if lines.len() < 3 {
        return Err(DataError::Malformed {
            line: lines.len(),
            message: "a Li & Lim file needs a header, a depot, and at least one customer".into(),
        });
    }

    // Header: vehicleCount capacity speed.
    let header: Vec<&str> = lines[0].1.split_whitespace().collect();
    if header.len() != 3 {
        return Err(DataError::Malformed {
            line: lines[0].0,
            message: format!("header must have 3 fields, got {}", header.len()),
        });
    }
    let vehicle_count: usize = header[0].parse().map_err(|_| DataError::Malformed {
        line: lines[0].0,
        message: format!("invalid vehicle count `{}`", header[0]),
    })?;
    let capacity: f64 = header[1].parse().map_err(|_| DataError::Malformed {
        line: lines[0].0,
        message: format!("invalid capacity `{}`", header[1]),
    })?;
    let speed: f64 = header[2].parse().map_err(|_| DataError::Malformed {
        line: lines[0].0,
        message: format!("invalid speed `{}`", header[2]),
    })?;
    if vehicle_count == 0 || capacity <= 0.0 || speed <= 0.0 {
        return Err(DataError::Malformed {
            line: lines[0].0,
            message: "vehicle count, capacity, and speed must be positive".into(),
        });
    }

    let depot = parse_row(lines[1].0, lines[1].1)?;
    if depot.id != 0 {
        return Err(DataError::BadDepotId(depot.id));
    }

    let mut customers: FxHashMap<usize, NodeRow> = FxHashMap::default();
    for &(line_number, line) in &lines[2..] {
        let row = parse_row(line_number, line)?;
        if row.id == 0 {
            return Err(DataError::Malformed {
                line: line_number,
                message: "node id 0 is reserved for the depot".into(),
            });
        }
        if customers.insert(row.id, row).is_some() {
            return Err(DataError::Malformed {
                line: line_number,
                message: format!("duplicate node id {}", row.id),
            });
        }
    }

    let mut customer_ids: Vec<usize> = customers.keys().copied().collect();
    customer_ids.sort_unstable();
    let max_customer_id = *customer_ids.last().expect("at least one customer");

    // Locations: depot first, then the customers in id order.
    let mut locations = vec![Location::from_cartesian(depot.x, depot.y)];
    let depot_location = LocationIdx::new(0);
    let mut nodes = Vec::new();
    for &id in &customer_ids {
        let row = customers[&id];
        let location = LocationIdx::new(locations.len());
        locations.push(Location::from_cartesian(row.x, row.y));
        nodes.push(Node::new(
            NodeId::new(id),
            location,
            row.tw_early,
            row.tw_late,
            row.service,
            row.demand,
        ));
    }

    // One private depot pair per vehicle, above the customer ids.
    let vehicle_ids: FxHashSet<VehicleId> = (1..=vehicle_count).map(VehicleId::new).collect();
    let mut vehicles = Vec::new();
    for v in 1..=vehicle_count {
        let start_id = NodeId::new(max_customer_id + 2 * (v - 1) + 1);
        let end_id = NodeId::new(max_customer_id + 2 * (v - 1) + 2);
        for node_id in [start_id, end_id] {
            nodes.push(Node::new(
                node_id,
                depot_location,
                depot.tw_early,
                depot.tw_late,
                depot.service,
                depot.demand,
            ));
        }
        vehicles.push(Vehicle::new(VehicleId::new(v), capacity, speed, start_id, end_id));
    }

    // Pair every positive-demand customer with its delivery node.
    let mut requests = Vec::new();
    for &id in &customer_ids {
        let pickup = customers[&id];
        if pickup.demand <= 0.0 || pickup.delivery_index == 0 {
            continue;
        }

        let delivery = customers.get(&pickup.delivery_index).ok_or_else(|| {
            DataError::DanglingNode {
                referenced: pickup.delivery_index,
                by: format!("pickup node {id}"),
            }
        })?;
        if pickup.demand.abs() != delivery.demand.abs() {
            return Err(DataError::DemandMismatch {
                pickup: id,
                delivery: delivery.id,
            });
        }

        requests.push(Request::new(
            RequestId::new(requests.len() + 1),
            NodeId::new(id),
            NodeId::new(delivery.id),
            pickup.demand,
            vehicle_ids.clone(),
        ));
    }

    let mut builder = ProblemInstanceBuilder::default();
    builder
        .set_locations(locations)
        .set_nodes(nodes)
        .set_requests(requests)
        .set_vehicles(vehicles);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2\t200\t1
0\t40\t50\t0\t0\t1236\t0\t0\t0
1\t45\t68\t10\t0\t1127\t90\t0\t2
2\t45\t70\t-10\t0\t1125\t90\t1\t0
3\t42\t66\t20\t0\t1129\t90\t0\t4
4\t42\t68\t-20\t0\t1130\t90\t3\t0
";

    #[test]
    fn parses_the_sample_instance() {
        let instance = parse(SAMPLE).unwrap();

        assert_eq!(instance.vehicles().len(), 2);
        assert_eq!(instance.requests().len(), 2);
        // Four customers plus a depot pair per vehicle.
        assert_eq!(instance.nodes().len(), 8);

        let request = instance.request(RequestId::new(1));
        assert_eq!(request.pickup(), NodeId::new(1));
        assert_eq!(request.delivery(), NodeId::new(2));
        assert_eq!(request.required_capacity(), 10.0);
        assert_eq!(request.compatible_vehicles().len(), 2);

        // Depot clones live above the customer ids and share one location.
        let first = instance.vehicle(VehicleId::new(1));
        let second = instance.vehicle(VehicleId::new(2));
        assert_eq!(first.start_node(), NodeId::new(5));
        assert_eq!(first.end_node(), NodeId::new(6));
        assert_eq!(second.start_node(), NodeId::new(7));
        assert_eq!(second.end_node(), NodeId::new(8));
        assert_eq!(
            instance.distance(first.start_node(), NodeId::new(1)),
            instance.distance(second.start_node(), NodeId::new(1))
        );

        // Symmetric distances with a zero diagonal.
        assert_eq!(
            instance.distance(NodeId::new(1), NodeId::new(3)),
            instance.distance(NodeId::new(3), NodeId::new(1))
        );
        assert_eq!(instance.distance(NodeId::new(1), NodeId::new(1)), 0.0);
    }

    #[test]
    fn rejects_a_non_zero_depot_id() {
        let text = SAMPLE.replacen("0\t40\t50", "7\t40\t50", 1);
        assert_eq!(parse(&text), Err(DataError::BadDepotId(7)));
    }

    #[test]
    fn rejects_mismatched_pair_demands() {
        let text = SAMPLE.replace("2\t45\t70\t-10", "2\t45\t70\t-11");
        assert_eq!(
            parse(&text),
            Err(DataError::DemandMismatch {
                pickup: 1,
                delivery: 2
            })
        );
    }

    #[test]
    fn rejects_a_dangling_delivery_index() {
        let text = SAMPLE.replace("1\t45\t68\t10\t0\t1127\t90\t0\t2", "1\t45\t68\t10\t0\t1127\t90\t0\t9");
        assert!(matches!(
            parse(&text),
            Err(DataError::DanglingNode { referenced: 9, .. })
        ));
    }

    #[test]
    fn rejects_short_rows() {
        let text = "1\t10\t1\n0\t0\t0\t0\t0\t10\t0\t0\n1\t1\t1\t1\t0\t10\t0\t0\t0\n";
        assert!(matches!(
            parse(text),
            Err(DataError::Malformed { line: 2, .. })
        ));
    }
}
