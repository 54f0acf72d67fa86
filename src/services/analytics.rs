//! Análisis sobre la colección completa de registros
//!
//! Funciones puras: reciben la lista ya leída y, cuando dependen del reloj,
//! el instante `now`. Ninguna falla por datos vacíos; devuelven un `Report`
//! con estado `no_data`. Los empates en los "más frecuentes" se resuelven a
//! favor del primero encontrado en el orden de la lista.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::analytics::{
    AverageCost, DueSoon, DueSoonEntry, MechanicCost, MechanicCosts, Overdue, OverdueEntry,
    RecentService, Report, ServiceCount, ServiceTypeFrequency, TopMechanic, TopOwner,
};
use crate::models::VehicleServiceLog;

pub const DEFAULT_DUE_SOON_DAYS: u32 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// Días completos entre dos instantes, redondeando hacia abajo
fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Conteo por clave conservando el orden de primera aparición
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for key in keys {
        match positions.get(key) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// Máximo estricto: en caso de empate gana el primero
fn top_entry<'a>(counts: &[(&'a str, usize)]) -> Option<(&'a str, usize)> {
    counts.iter().fold(None, |best, &(key, count)| match best {
        Some((_, best_count)) if best_count >= count => best,
        _ => Some((key, count)),
    })
}

pub fn total_count(logs: &[VehicleServiceLog]) -> Report<ServiceCount> {
    if logs.is_empty() {
        return Report::no_data_with(ServiceCount { total_services: 0 });
    }
    let total = logs.len();
    Report::ok(
        ServiceCount { total_services: total },
        format!("There are {} service logs in total", total),
    )
}

pub fn average_cost(logs: &[VehicleServiceLog]) -> Report<AverageCost> {
    if logs.is_empty() {
        return Report::no_data_with(AverageCost {
            average_cost: 0.0,
            total_cost: 0.0,
            service_count: 0,
        });
    }

    let total_cost: f64 = logs.iter().map(|log| log.cost).sum();
    let average = total_cost / logs.len() as f64;
    Report::ok(
        AverageCost {
            average_cost: average,
            total_cost,
            service_count: logs.len(),
        },
        format!("The average service cost is {:.2} across {} services", average, logs.len()),
    )
}

pub fn most_frequent_service_type(logs: &[VehicleServiceLog]) -> Report<ServiceTypeFrequency> {
    let counts = tally(logs.iter().map(|log| log.service_type.as_str()));
    match top_entry(&counts) {
        Some((service_type, frequency)) => Report::ok(
            ServiceTypeFrequency {
                service_type: service_type.to_string(),
                frequency,
            },
            format!(
                "The most frequent service type is '{}' ({} times)",
                service_type, frequency
            ),
        ),
        None => Report::no_data(),
    }
}

pub fn most_recent_service(logs: &[VehicleServiceLog]) -> Report<RecentService> {
    // max_by devuelve el último de los iguales; se recorre al revés para quedarse con el primero
    let latest = logs
        .iter()
        .rev()
        .max_by(|a, b| a.service_date.cmp(&b.service_date));

    match latest {
        Some(log) => Report::ok(
            RecentService { log: log.clone() },
            format!(
                "The most recent service was '{}' on vehicle {} on {}",
                log.service_type,
                log.vehicle_id,
                log.service_date.format("%Y-%m-%d")
            ),
        ),
        None => Report::no_data(),
    }
}

/// Vehículos cuyo próximo mantenimiento cae en `[now, now + days]`
///
/// Sólo se omiten registros sin `next_service_date`: las fechas ya llegan
/// tipadas y una fecha ilegible en almacenamiento falla antes, al leer.
pub fn vehicles_due_soon(logs: &[VehicleServiceLog], now: DateTime<Utc>, days: u32) -> Report<DueSoon> {
    if logs.is_empty() {
        return Report::no_data();
    }

    let horizon = now
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let vehicles: Vec<DueSoonEntry> = logs
        .iter()
        .filter_map(|log| {
            let next = log.next_service_date?;
            (next >= now && next <= horizon).then(|| DueSoonEntry {
                vehicle_id: log.vehicle_id.clone(),
                service_type: log.service_type.clone(),
                next_service_date: next,
                days_until: whole_days(now, next),
                log_id: log.id.clone(),
            })
        })
        .collect();

    let summary = if vehicles.is_empty() {
        format!("No vehicles are due for service in the next {} days", days)
    } else {
        format!(
            "{} vehicle(s) due for service in the next {} days",
            vehicles.len(),
            days
        )
    };
    Report::ok(DueSoon { days, vehicles }, summary)
}

/// Mantenimientos cuya fecha prevista ya pasó
///
/// Igual que en `vehicles_due_soon`, no hay fechas ilegibles que omitir.
pub fn overdue_services(logs: &[VehicleServiceLog], now: DateTime<Utc>) -> Report<Overdue> {
    if logs.is_empty() {
        return Report::no_data();
    }

    let services: Vec<OverdueEntry> = logs
        .iter()
        .filter_map(|log| {
            let next = log.next_service_date?;
            (next < now).then(|| OverdueEntry {
                vehicle_id: log.vehicle_id.clone(),
                service_type: log.service_type.clone(),
                next_service_date: next,
                days_overdue: whole_days(next, now),
                log_id: log.id.clone(),
            })
        })
        .collect();

    let summary = if services.is_empty() {
        "No overdue services".to_string()
    } else {
        format!("{} service(s) are overdue", services.len())
    };
    Report::ok(Overdue { services }, summary)
}

pub fn owner_with_most_services(logs: &[VehicleServiceLog]) -> Report<TopOwner> {
    let counts = tally(logs.iter().map(VehicleServiceLog::owner_or_unknown));
    match top_entry(&counts) {
        Some((owner, service_count)) => Report::ok(
            TopOwner {
                owner: owner.to_string(),
                service_count,
            },
            format!("{} has the most services ({})", owner, service_count),
        ),
        None => Report::no_data(),
    }
}

pub fn mechanic_with_most_services(logs: &[VehicleServiceLog]) -> Report<TopMechanic> {
    if logs.is_empty() {
        return Report::no_data();
    }

    let counts = tally(logs.iter().filter_map(VehicleServiceLog::known_mechanic));
    match top_entry(&counts) {
        Some((mechanic_id, service_count)) => Report::ok(
            TopMechanic {
                mechanic_id: mechanic_id.to_string(),
                service_count,
            },
            format!(
                "Mechanic {} has performed the most services ({})",
                mechanic_id, service_count
            ),
        ),
        None => Report::no_mechanic_info(),
    }
}

pub fn total_cost_by_mechanic(logs: &[VehicleServiceLog]) -> Report<MechanicCosts> {
    if logs.is_empty() {
        return Report::no_data();
    }

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut mechanics: Vec<MechanicCost> = Vec::new();

    for log in logs {
        let Some(mechanic_id) = log.known_mechanic() else {
            continue;
        };
        let index = *positions.entry(mechanic_id).or_insert_with(|| {
            mechanics.push(MechanicCost {
                mechanic_id: mechanic_id.to_string(),
                total_cost: 0.0,
                average_cost: 0.0,
                service_count: 0,
            });
            mechanics.len() - 1
        });
        let entry = &mut mechanics[index];
        entry.total_cost += log.cost;
        entry.service_count += 1;
    }

    if mechanics.is_empty() {
        return Report::no_mechanic_info();
    }

    for entry in &mut mechanics {
        entry.average_cost = entry.total_cost / entry.service_count as f64;
    }

    let summary = format!("Service costs computed for {} mechanic(s)", mechanics.len());
    Report::ok(MechanicCosts { mechanics }, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::ReportStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn log(id: &str, service_type: &str) -> VehicleServiceLog {
        VehicleServiceLog {
            id: id.to_string(),
            owner_name: None,
            vehicle_type: None,
            vehicle_id: format!("VEH-{}", id),
            service_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            service_type: service_type.to_string(),
            description: None,
            mileage: 1000,
            cost: 100.0,
            next_service_date: None,
            mechanic_id: None,
        }
    }

    fn with_next(mut log: VehicleServiceLog, next: DateTime<Utc>) -> VehicleServiceLog {
        log.next_service_date = Some(next);
        log
    }

    #[test]
    fn test_total_count() {
        let logs = vec![log("1", "a"), log("2", "b")];
        let report = total_count(&logs);
        assert!(report.is_ok());
        assert_eq!(report.data.unwrap().total_services, 2);

        let empty = total_count(&[]);
        assert_eq!(empty.status, ReportStatus::NoData);
        assert_eq!(empty.data.unwrap().total_services, 0);
    }

    #[test]
    fn test_average_cost() {
        let mut a = log("1", "a");
        a.cost = 50.0;
        let mut b = log("2", "b");
        b.cost = 150.0;
        let report = average_cost(&[a, b]);
        let data = report.data.unwrap();
        assert_eq!(data.average_cost, 100.0);
        assert_eq!(data.total_cost, 200.0);
        assert_eq!(data.service_count, 2);
        assert!(report.summary.contains("100.00"));
    }

    #[test]
    fn test_average_cost_empty_is_zero() {
        let report = average_cost(&[]);
        assert_eq!(report.status, ReportStatus::NoData);
        assert_eq!(report.data.unwrap().average_cost, 0.0);
    }

    #[test]
    fn test_most_frequent_service_type() {
        let logs = vec![
            log("1", "oil change"),
            log("2", "tire rotation"),
            log("3", "oil change"),
            log("4", "oil change"),
        ];
        let report = most_frequent_service_type(&logs);
        assert_eq!(
            report.data,
            Some(ServiceTypeFrequency {
                service_type: "oil change".to_string(),
                frequency: 3
            })
        );
    }

    #[test]
    fn test_most_frequent_tie_goes_to_first_encountered() {
        let logs = vec![
            log("1", "brakes"),
            log("2", "oil change"),
            log("3", "oil change"),
            log("4", "brakes"),
        ];
        assert_eq!(
            most_frequent_service_type(&logs).data.unwrap().service_type,
            "brakes"
        );

        let reversed: Vec<_> = logs.into_iter().rev().collect();
        assert_eq!(
            most_frequent_service_type(&reversed).data.unwrap().service_type,
            "brakes"
        );

        let swapped = vec![log("1", "oil change"), log("2", "brakes")];
        assert_eq!(
            most_frequent_service_type(&swapped).data.unwrap().service_type,
            "oil change"
        );
    }

    #[test]
    fn test_most_frequent_empty_is_no_data() {
        assert_eq!(most_frequent_service_type(&[]).status, ReportStatus::NoData);
    }

    #[test]
    fn test_most_recent_service() {
        let mut older = log("1", "a");
        older.service_date = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut newer = log("2", "b");
        newer.service_date = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        let mut middle = log("3", "c");
        middle.service_date = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        let report = most_recent_service(&[older, newer, middle]);
        assert_eq!(report.data.unwrap().log.id, "2");
        assert!(report.summary.contains("2026-09-01"));
    }

    #[test]
    fn test_most_recent_tie_goes_to_first_in_list() {
        let logs = vec![log("1", "a"), log("2", "b"), log("3", "c")];
        assert_eq!(most_recent_service(&logs).data.unwrap().log.id, "1");
        assert_eq!(most_recent_service(&[]).status, ReportStatus::NoData);
    }

    #[test]
    fn test_due_soon_and_overdue_windows() {
        let t = now();
        let logs = vec![
            with_next(log("past", "a"), t - Duration::days(5)),
            with_next(log("soon", "b"), t + Duration::days(10)),
            with_next(log("later", "c"), t + Duration::days(40)),
            log("none", "d"),
        ];

        let due = vehicles_due_soon(&logs, t, 30).data.unwrap();
        assert_eq!(due.days, 30);
        assert_eq!(due.vehicles.len(), 1);
        assert_eq!(due.vehicles[0].log_id, "soon");
        assert_eq!(due.vehicles[0].days_until, 10);

        let overdue = overdue_services(&logs, t).data.unwrap();
        assert_eq!(overdue.services.len(), 1);
        assert_eq!(overdue.services[0].log_id, "past");
        assert_eq!(overdue.services[0].days_overdue, 5);
    }

    #[test]
    fn test_due_soon_window_bounds_are_inclusive() {
        let t = now();
        let logs = vec![
            with_next(log("now", "a"), t),
            with_next(log("edge", "b"), t + Duration::days(7)),
            with_next(log("beyond", "c"), t + Duration::days(7) + Duration::seconds(1)),
        ];
        let due = vehicles_due_soon(&logs, t, 7).data.unwrap();
        let ids: Vec<_> = due.vehicles.iter().map(|v| v.log_id.as_str()).collect();
        assert_eq!(ids, vec!["now", "edge"]);

        assert!(overdue_services(&logs, t).data.unwrap().services.is_empty());
    }

    #[test]
    fn test_days_overdue_counts_whole_days() {
        let t = now();
        let logs = vec![
            with_next(log("hours", "a"), t - Duration::hours(5)),
            with_next(log("days", "b"), t - Duration::days(2) - Duration::hours(23)),
        ];
        let overdue = overdue_services(&logs, t).data.unwrap();
        assert_eq!(overdue.services[0].days_overdue, 0);
        assert_eq!(overdue.services[1].days_overdue, 2);
    }

    #[test]
    fn test_due_soon_without_matches_is_ok_and_empty() {
        let logs = vec![log("1", "a")];
        let report = vehicles_due_soon(&logs, now(), DEFAULT_DUE_SOON_DAYS);
        assert!(report.is_ok());
        assert!(report.data.unwrap().vehicles.is_empty());
        assert_eq!(vehicles_due_soon(&[], now(), 30).status, ReportStatus::NoData);
        assert_eq!(overdue_services(&[], now()).status, ReportStatus::NoData);
    }

    #[test]
    fn test_owner_with_most_services_defaults_to_unknown() {
        let mut a = log("1", "x");
        a.owner_name = Some("Alice".to_string());
        let b = log("2", "x");
        let c = log("3", "x");
        let report = owner_with_most_services(&[a.clone(), b, c]);
        assert_eq!(
            report.data,
            Some(TopOwner {
                owner: "Unknown".to_string(),
                service_count: 2
            })
        );

        let report = owner_with_most_services(&[a]);
        assert_eq!(report.data.unwrap().owner, "Alice");
        assert_eq!(owner_with_most_services(&[]).status, ReportStatus::NoData);
    }

    #[test]
    fn test_mechanic_credit_only_for_tagged_records() {
        let mut tagged = log("1", "x");
        tagged.mechanic_id = Some("MECH-1".to_string());
        let mut sentinel = log("2", "x");
        sentinel.mechanic_id = Some("Unknown".to_string());
        let logs = vec![log("0", "x"), tagged, sentinel, log("3", "x")];

        let report = mechanic_with_most_services(&logs);
        assert_eq!(
            report.data,
            Some(TopMechanic {
                mechanic_id: "MECH-1".to_string(),
                service_count: 1
            })
        );
    }

    #[test]
    fn test_mechanic_reports_distinguish_no_data_from_no_mechanic() {
        let untagged = vec![log("1", "x"), log("2", "y")];
        assert_eq!(
            mechanic_with_most_services(&untagged).status,
            ReportStatus::NoMechanicInfo
        );
        assert_eq!(mechanic_with_most_services(&[]).status, ReportStatus::NoData);
        assert_eq!(
            total_cost_by_mechanic(&untagged).status,
            ReportStatus::NoMechanicInfo
        );
        assert_eq!(total_cost_by_mechanic(&[]).status, ReportStatus::NoData);
    }

    #[test]
    fn test_total_cost_by_mechanic() {
        let entries = [("M-2", 100.0), ("M-1", 40.0), ("M-2", 300.0), ("Unknown", 999.0)];
        let mut logs: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, (mechanic, cost))| {
                let mut l = log(&i.to_string(), "x");
                l.mechanic_id = Some(mechanic.to_string());
                l.cost = *cost;
                l
            })
            .collect();
        logs.push(log("untagged", "x"));

        let costs = total_cost_by_mechanic(&logs).data.unwrap().mechanics;
        assert_eq!(
            costs,
            vec![
                MechanicCost {
                    mechanic_id: "M-2".to_string(),
                    total_cost: 400.0,
                    average_cost: 200.0,
                    service_count: 2
                },
                MechanicCost {
                    mechanic_id: "M-1".to_string(),
                    total_cost: 40.0,
                    average_cost: 40.0,
                    service_count: 1
                },
            ]
        );
    }
}
