//! Line and station operations.
//!
//! Operations that check a station exists and then write a line keep the
//! station registry locked until the write is done, so a station cannot be
//! deleted between the check and the commit.

use tracing::{debug, info, warn};

use crate::domain::{Distance, Line, LineId, Section, Station, StationId};
use crate::repository::{LineRepository, StationRegistry, StationsRead};

use super::error::ServiceError;

/// Request to create a line with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: i64,
}

/// Request to register a section on an existing line.
#[derive(Debug, Clone, Copy)]
pub struct NewSection {
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: i64,
}

/// Partial update of a line's attributes. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct LineUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// A line with its stations resolved, head to tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<Station>,
}

/// Line service over in-memory stores.
///
/// Cheap to clone; clones share the same stores.
#[derive(Clone, Default)]
pub struct LineService {
    stations: StationRegistry,
    lines: LineRepository,
}

impl LineService {
    /// Create a service with empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service over existing stores.
    pub fn with_stores(stations: StationRegistry, lines: LineRepository) -> Self {
        Self { stations, lines }
    }

    /// Register a station.
    pub async fn create_station(&self, name: &str) -> Result<Station, ServiceError> {
        let station = self.stations.create(name).await?;
        info!(station = %station.id(), name = station.name(), "created station");
        Ok(station)
    }

    /// All stations, ordered by id.
    pub async fn list_stations(&self) -> Vec<Station> {
        self.stations.list().await
    }

    /// Delete a station that no line uses.
    ///
    /// The registry stays write-locked while lines are scanned, so no line
    /// can start using the station before it is gone.
    pub async fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        let mut stations = self.stations.write().await;
        if !stations.contains(id) {
            return Err(ServiceError::StationNotFound(id));
        }

        for handle in self.lines.all().await {
            let line = handle.lock().await;
            if line.sections().contains(id) {
                return Err(ServiceError::StationInUse {
                    station: id,
                    line: line.id(),
                });
            }
        }

        stations
            .remove(id)
            .ok_or(ServiceError::StationNotFound(id))?;
        info!(station = %id, "deleted station");
        Ok(())
    }

    /// Create a line with its first section.
    pub async fn create_line(&self, request: NewLine) -> Result<LineView, ServiceError> {
        let stations = self.stations.read().await;
        let first = section(
            &stations,
            request.up_station,
            request.down_station,
            request.distance,
        )?;

        let line = self
            .lines
            .insert_with(|id| {
                Line::new(id, &request.name, &request.color, first).map_err(ServiceError::from)
            })
            .await?;

        info!(line = %line.id(), name = line.name(), "created line");
        view(&stations, &line)
    }

    /// All lines with their stations, ordered by id.
    ///
    /// A line whose stations cannot be resolved is logged and left out
    /// rather than failing the whole listing.
    pub async fn list_lines(&self) -> Vec<LineView> {
        let stations = self.stations.read().await;
        let mut views = Vec::new();
        for handle in self.lines.all().await {
            let line = handle.lock().await.clone();
            match view(&stations, &line) {
                Ok(view) => views.push(view),
                Err(e) => warn!(line = %line.id(), "skipping line: {e}"),
            }
        }
        views
    }

    /// One line with its stations.
    pub async fn get_line(&self, id: LineId) -> Result<LineView, ServiceError> {
        let stations = self.stations.read().await;
        let line = self.load(id).await?;
        view(&stations, &line)
    }

    /// Change a line's name and/or color.
    pub async fn update_line(
        &self,
        id: LineId,
        update: LineUpdate,
    ) -> Result<LineView, ServiceError> {
        let stations = self.stations.read().await;
        let line = self
            .lines
            .update_with(id, |line| {
                if let Some(name) = &update.name {
                    line.rename(name)?;
                }
                if let Some(color) = &update.color {
                    line.recolor(color)?;
                }
                Ok::<_, ServiceError>(())
            })
            .await?
            .ok_or(ServiceError::LineNotFound(id))?;

        info!(line = %id, name = line.name(), color = line.color(), "updated line");
        view(&stations, &line)
    }

    /// Delete a line and all its sections.
    pub async fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        let line = self
            .lines
            .remove(id)
            .await
            .ok_or(ServiceError::LineNotFound(id))?;
        info!(line = %id, name = line.name(), "deleted line");
        Ok(())
    }

    /// Register a section on a line.
    ///
    /// Holds the line's lock across the topology check and the write, so
    /// concurrent section changes on the same line cannot interleave.
    pub async fn add_section(
        &self,
        id: LineId,
        request: NewSection,
    ) -> Result<LineView, ServiceError> {
        let stations = self.stations.read().await;
        let section = section(
            &stations,
            request.up_station,
            request.down_station,
            request.distance,
        )?;
        let handle = self
            .lines
            .get(id)
            .await
            .ok_or(ServiceError::LineNotFound(id))?;

        let line = {
            let mut line = handle.lock().await;
            line.add_section(section)?;
            line.clone()
        };

        debug!(
            line = %id,
            upstream = %section.upstream(),
            downstream = %section.downstream(),
            distance = section.distance().get(),
            "added section"
        );
        view(&stations, &line)
    }

    /// Remove the last station of a line.
    pub async fn remove_section(&self, id: LineId, station: StationId) -> Result<(), ServiceError> {
        let handle = self
            .lines
            .get(id)
            .await
            .ok_or(ServiceError::LineNotFound(id))?;
        handle.lock().await.remove_station(station)?;

        debug!(line = %id, %station, "removed last station");
        Ok(())
    }

    /// Snapshot of a stored line.
    async fn load(&self, id: LineId) -> Result<Line, ServiceError> {
        let handle = self
            .lines
            .get(id)
            .await
            .ok_or(ServiceError::LineNotFound(id))?;
        let line = handle.lock().await.clone();
        Ok(line)
    }
}

/// Build a validated section whose stations are both registered.
fn section(
    stations: &StationsRead<'_>,
    upstream: StationId,
    downstream: StationId,
    distance: i64,
) -> Result<Section, ServiceError> {
    let section = Section::new(upstream, downstream, Distance::new(distance)?)?;
    for station in [upstream, downstream] {
        if !stations.contains(station) {
            return Err(ServiceError::UnknownStation(station));
        }
    }
    Ok(section)
}

/// Resolve a line's ordered station ids to stations.
fn view(stations: &StationsRead<'_>, line: &Line) -> Result<LineView, ServiceError> {
    let stations = stations
        .get_many(&line.stations())
        .map_err(ServiceError::UnknownStation)?;

    Ok(LineView {
        id: line.id(),
        name: line.name().to_string(),
        color: line.color().to_string(),
        stations,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::topology::TopologyError;

    struct Fixture {
        service: LineService,
        yeonsinnae: StationId,
        seoul: StationId,
        samseong: StationId,
    }

    async fn fixture() -> Fixture {
        let service = LineService::new();
        let yeonsinnae = service.create_station("Yeonsinnae").await.unwrap().id();
        let seoul = service.create_station("Seoul").await.unwrap().id();
        let samseong = service.create_station("Samseong").await.unwrap().id();
        Fixture {
            service,
            yeonsinnae,
            seoul,
            samseong,
        }
    }

    fn gtx_a(up: StationId, down: StationId, distance: i64) -> NewLine {
        NewLine {
            name: "GTX-A".to_string(),
            color: "bg-red-900".to_string(),
            up_station: up,
            down_station: down,
            distance,
        }
    }

    fn names(view: &LineView) -> Vec<&str> {
        view.stations.iter().map(Station::name).collect()
    }

    #[tokio::test]
    async fn create_line_returns_both_stations() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        assert_eq!(line.id, LineId(1));
        assert_eq!(line.name, "GTX-A");
        assert_eq!(line.color, "bg-red-900");
        assert_eq!(names(&line), vec!["Yeonsinnae", "Seoul"]);
    }

    #[tokio::test]
    async fn duplicate_line_name_conflicts() {
        let f = fixture().await;
        f.service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        assert_eq!(
            f.service
                .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
                .await,
            Err(ServiceError::DuplicateLineName("GTX-A".to_string()))
        );
    }

    #[tokio::test]
    async fn create_line_validates_inputs() {
        let f = fixture().await;

        assert_eq!(
            f.service
                .create_line(gtx_a(StationId(99), f.seoul, 10))
                .await,
            Err(ServiceError::UnknownStation(StationId(99)))
        );
        assert_eq!(
            f.service
                .create_line(gtx_a(f.yeonsinnae, f.seoul, -1))
                .await,
            Err(ServiceError::Domain(DomainError::InvalidDistance(-1)))
        );
        assert_eq!(
            f.service
                .create_line(gtx_a(f.seoul, f.seoul, 10))
                .await,
            Err(ServiceError::Domain(DomainError::SameEndpoints(f.seoul)))
        );
        assert!(f.service.list_lines().await.is_empty());
    }

    #[tokio::test]
    async fn list_lines_in_id_order() {
        let f = fixture().await;
        f.service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();
        let gangnam = f.service.create_station("Gangnam").await.unwrap().id();
        let yangjae = f.service.create_station("Yangjae").await.unwrap().id();
        f.service
            .create_line(NewLine {
                name: "Sinbundang".to_string(),
                color: "bg-red-600".to_string(),
                up_station: gangnam,
                down_station: yangjae,
                distance: 7,
            })
            .await
            .unwrap();

        let lines = f.service.list_lines().await;
        let line_names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(line_names, vec!["GTX-A", "Sinbundang"]);
    }

    #[tokio::test]
    async fn add_section_at_tail_orders_stations() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        let updated = f
            .service
            .add_section(
                line.id,
                NewSection {
                    up_station: f.seoul,
                    down_station: f.samseong,
                    distance: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(names(&updated), vec!["Yeonsinnae", "Seoul", "Samseong"]);

        let fetched = f.service.get_line(line.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn add_section_mid_path() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.samseong, 10))
            .await
            .unwrap();

        let updated = f
            .service
            .add_section(
                line.id,
                NewSection {
                    up_station: f.yeonsinnae,
                    down_station: f.seoul,
                    distance: 4,
                },
            )
            .await
            .unwrap();
        assert_eq!(names(&updated), vec!["Yeonsinnae", "Seoul", "Samseong"]);
    }

    #[tokio::test]
    async fn add_section_mid_path_equal_distance_rejected() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.samseong, 5))
            .await
            .unwrap();

        let result = f
            .service
            .add_section(
                line.id,
                NewSection {
                    up_station: f.yeonsinnae,
                    down_station: f.seoul,
                    distance: 5,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Topology(TopologyError::SectionTooLong { .. }))
        ));
    }

    #[tokio::test]
    async fn add_section_rejects_duplicate_and_reversed() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        for (up, down) in [(f.yeonsinnae, f.seoul), (f.seoul, f.yeonsinnae)] {
            let result = f
                .service
                .add_section(
                    line.id,
                    NewSection {
                        up_station: up,
                        down_station: down,
                        distance: 5,
                    },
                )
                .await;
            assert!(matches!(
                result,
                Err(ServiceError::Topology(TopologyError::DuplicateSection { .. }))
            ));
        }
    }

    #[tokio::test]
    async fn add_section_to_missing_line() {
        let f = fixture().await;
        let result = f
            .service
            .add_section(
                LineId(7),
                NewSection {
                    up_station: f.seoul,
                    down_station: f.samseong,
                    distance: 5,
                },
            )
            .await;
        assert_eq!(result, Err(ServiceError::LineNotFound(LineId(7))));
    }

    #[tokio::test]
    async fn remove_section_rules() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        assert_eq!(
            f.service.remove_section(line.id, f.seoul).await,
            Err(ServiceError::Topology(
                TopologyError::MinimumSectionViolation
            ))
        );

        f.service
            .add_section(
                line.id,
                NewSection {
                    up_station: f.seoul,
                    down_station: f.samseong,
                    distance: 10,
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            f.service.remove_section(line.id, f.seoul).await,
            Err(ServiceError::Topology(
                TopologyError::InvalidRemovalTarget { .. }
            ))
        ));

        f.service.remove_section(line.id, f.samseong).await.unwrap();
        let line = f.service.get_line(line.id).await.unwrap();
        assert_eq!(names(&line), vec!["Yeonsinnae", "Seoul"]);
    }

    #[tokio::test]
    async fn update_line_color_keeps_name() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        let updated = f
            .service
            .update_line(
                line.id,
                LineUpdate {
                    name: None,
                    color: Some("bg-red-800".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "GTX-A");
        assert_eq!(updated.color, "bg-red-800");
    }

    #[tokio::test]
    async fn update_missing_line() {
        let f = fixture().await;
        assert_eq!(
            f.service
                .update_line(LineId(3), LineUpdate::default())
                .await,
            Err(ServiceError::LineNotFound(LineId(3)))
        );
    }

    #[tokio::test]
    async fn delete_line_then_get_is_not_found() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        f.service.delete_line(line.id).await.unwrap();
        assert_eq!(
            f.service.get_line(line.id).await,
            Err(ServiceError::LineNotFound(line.id))
        );
        assert_eq!(
            f.service.delete_line(line.id).await,
            Err(ServiceError::LineNotFound(line.id))
        );
    }

    #[tokio::test]
    async fn station_in_use_cannot_be_deleted() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        assert_eq!(
            f.service.delete_station(f.seoul).await,
            Err(ServiceError::StationInUse {
                station: f.seoul,
                line: line.id,
            })
        );

        f.service.delete_station(f.samseong).await.unwrap();
        assert_eq!(
            f.service.delete_station(f.samseong).await,
            Err(ServiceError::StationNotFound(f.samseong))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tail_extensions_stay_a_path() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();

        // Every task races to extend from the same tail; exactly one wins.
        let mut extra = Vec::new();
        for i in 0..8 {
            extra.push(
                f.service
                    .create_station(&format!("Extra {i}"))
                    .await
                    .unwrap()
                    .id(),
            );
        }

        let line_id = line.id;
        let tail = f.seoul;
        let tasks: Vec<_> = extra
            .iter()
            .map(|&station| {
                let service = f.service.clone();
                tokio::spawn(async move {
                    service
                        .add_section(
                            line_id,
                            NewSection {
                                up_station: tail,
                                down_station: station,
                                distance: 3,
                            },
                        )
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        let line = f.service.get_line(line_id).await.unwrap();
        // The first writer extends the tail; later writers split its new
        // section (3 -> 3 is too long), so only one succeeds.
        assert_eq!(successes, 1);
        assert_eq!(line.stations.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn station_deletion_and_section_add_agree() {
        let f = fixture().await;
        let line = f
            .service
            .create_line(gtx_a(f.yeonsinnae, f.seoul, 10))
            .await
            .unwrap();
        let line_id = line.id;

        let mut tail = f.seoul;
        for i in 0..32 {
            let station = f
                .service
                .create_station(&format!("Extra {i}"))
                .await
                .unwrap()
                .id();

            let service = f.service.clone();
            let adder = tokio::spawn(async move {
                service
                    .add_section(
                        line_id,
                        NewSection {
                            up_station: tail,
                            down_station: station,
                            distance: 3,
                        },
                    )
                    .await
            });
            let service = f.service.clone();
            let deleter = tokio::spawn(async move { service.delete_station(station).await });

            let added = adder.await.unwrap();
            let deleted = deleter.await.unwrap();
            match (&added, &deleted) {
                (Ok(_), Err(ServiceError::StationInUse { .. })) => tail = station,
                (Err(ServiceError::UnknownStation(missing)), Ok(())) => {
                    assert_eq!(*missing, station)
                }
                other => panic!("add and delete both took effect: {other:?}"),
            }

            let line = f.service.get_line(line_id).await.unwrap();
            assert_eq!(line.stations.last().map(Station::id), Some(tail));
        }
        assert_eq!(f.service.list_lines().await.len(), 1);
    }

    #[tokio::test]
    async fn list_lines_skips_line_with_unregistered_station() {
        let stations = StationRegistry::new();
        let lines = LineRepository::new();
        let service = LineService::with_stores(stations.clone(), lines.clone());

        let stray = lines
            .insert_with(|id| {
                let section = Section::new(StationId(98), StationId(99), Distance::new(5)?)?;
                Line::new(id, "Stray", "bg-gray-500", section).map_err(ServiceError::from)
            })
            .await
            .unwrap();

        let up = stations.create("Yeonsinnae").await.unwrap().id();
        let down = stations.create("Seoul").await.unwrap().id();
        service.create_line(gtx_a(up, down, 10)).await.unwrap();

        let listed = service.list_lines().await;
        let line_names: Vec<&str> = listed.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(line_names, vec!["GTX-A"]);
        assert_eq!(
            service.get_line(stray.id()).await,
            Err(ServiceError::UnknownStation(StationId(98)))
        );
    }
}
