use std::fmt;

use serde::Serialize;

use crate::problem::instance::ProblemInstance;

use super::working_solution::Solution;

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub vehicle: usize,
    pub nodes: Vec<usize>,
    pub distance: f64,
    pub duration: f64,
}

/// The reporting surface of a finished solve: ordered node-id lists per
/// vehicle, per-route and total figures, and the unassigned leftovers.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSummary {
    pub routes: Vec<RouteSummary>,
    pub total_distance: f64,
    pub total_duration: f64,
    pub unassigned_requests: Vec<usize>,
    pub objective: f64,
}

impl SolutionSummary {
    pub fn of(solution: &Solution, instance: &ProblemInstance) -> Self {
        let mut routes: Vec<RouteSummary> = solution
            .routes()
            .iter()
            .map(|(vehicle_id, route)| RouteSummary {
                vehicle: vehicle_id.get(),
                nodes: route.nodes().iter().map(|n| n.get()).collect(),
                distance: route.whole_distance(),
                duration: route.whole_duration(),
            })
            .collect();
        routes.sort_unstable_by_key(|r| r.vehicle);

        let mut unassigned_requests: Vec<usize> =
            solution.request_bank().iter().map(|r| r.get()).collect();
        unassigned_requests.sort_unstable();

        SolutionSummary {
            routes,
            total_distance: solution.distance_cost(),
            total_duration: solution.time_cost(),
            unassigned_requests,
            objective: solution.objective(instance),
        }
    }
}

impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "vehicles: {}, distance: {:.3}, duration: {:.3}, unassigned: {}, objective: {:.3}",
            self.routes.len(),
            self.total_distance,
            self.total_duration,
            self.unassigned_requests.len(),
            self.objective
        )?;
        for route in &self.routes {
            let nodes: Vec<String> = route.nodes.iter().map(|n| n.to_string()).collect();
            writeln!(
                f,
                "  vehicle {:>3}  distance {:>10.3}  duration {:>10.3}  [{}]",
                route.vehicle,
                route.distance,
                route.duration,
                nodes.join(" ")
            )?;
        }
        Ok(())
    }
}
