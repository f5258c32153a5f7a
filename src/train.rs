use thiserror::Error;

use crate::vec2::Vec2;

pub(crate) type TrainId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TrainClass {
    Express,
    Passenger,
    Freight,
}

impl TrainClass {
    pub fn label(&self) -> &'static str {
        match self {
            TrainClass::Express => "Express",
            TrainClass::Passenger => "Passenger",
            TrainClass::Freight => "Freight",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Train {
    pub id: TrainId,
    pub name: String,
    /// Current leg endpoints. Swapped in place whenever the train arrives,
    /// so the train shuttles back and forth on the same track forever.
    pub from: String,
    pub to: String,
    pub weight_tonnes: f64,
    pub speed_kmh: f64,
    pub class: TrainClass,
    /// Derived from progress every tick; (0, 0) until the first one.
    pub pos: Vec2,
    /// Fractional completion of the current leg, 0..100.
    pub progress: f64,
    pub active: bool,
}

/// What the presentation layer hands us when the user submits the form.
#[derive(Clone, Debug)]
pub(crate) struct TrainRequest {
    pub name: String,
    pub from: String,
    pub to: String,
    pub weight_tonnes: f64,
    pub speed_kmh: f64,
    pub class: TrainClass,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RequestError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// The only mutable state of the simulation: the ordered list of trains.
/// Insertion order is display order; ids come from a monotonic counter.
#[derive(Default)]
pub(crate) struct TrainRegistry {
    pub trains: Vec<Train>,
    train_id_gen: TrainId,
}

impl TrainRegistry {
    /// Validates and appends a train. Note that origin == destination is not
    /// rejected here; such a train resolves no track and simply never moves.
    pub fn add_train(&mut self, request: TrainRequest) -> Result<TrainId, RequestError> {
        if request.name.trim().is_empty() {
            return Err(RequestError::MissingField("name"));
        }
        if request.from.is_empty() {
            return Err(RequestError::MissingField("origin"));
        }
        if request.to.is_empty() {
            return Err(RequestError::MissingField("destination"));
        }
        if !(request.weight_tonnes > 0.) {
            return Err(RequestError::NonPositive("weight"));
        }
        if !(request.speed_kmh > 0.) {
            return Err(RequestError::NonPositive("speed"));
        }

        let id = self.train_id_gen;
        self.train_id_gen += 1;
        self.trains.push(Train {
            id,
            name: request.name,
            from: request.from,
            to: request.to,
            weight_tonnes: request.weight_tonnes,
            speed_kmh: request.speed_kmh,
            class: request.class,
            pos: Vec2::zero(),
            progress: 0.,
            active: true,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TrainRequest {
        TrainRequest {
            name: "Shatabdi 12028".to_string(),
            from: "bangalore".to_string(),
            to: "chennai".to_string(),
            weight_tonnes: 500.,
            speed_kmh: 80.,
            class: TrainClass::Express,
        }
    }

    #[test]
    fn accepted_train_starts_at_rest() {
        let mut registry = TrainRegistry::default();
        let id = registry.add_train(request()).unwrap();
        let train = &registry.trains[0];
        assert_eq!(train.id, id);
        assert_eq!(train.progress, 0.);
        assert_eq!(train.pos, Vec2::zero());
        assert!(train.active);
    }

    #[test]
    fn ids_are_unique_and_order_is_insertion_order() {
        let mut registry = TrainRegistry::default();
        let a = registry.add_train(request()).unwrap();
        let b = registry.add_train(request()).unwrap();
        assert_ne!(a, b);
        assert_eq!(
            registry.trains.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![a, b]
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut registry = TrainRegistry::default();

        let mut no_name = request();
        no_name.name = "  ".to_string();
        assert_eq!(
            registry.add_train(no_name),
            Err(RequestError::MissingField("name"))
        );

        let mut no_origin = request();
        no_origin.from = String::new();
        assert_eq!(
            registry.add_train(no_origin),
            Err(RequestError::MissingField("origin"))
        );

        let mut zero_weight = request();
        zero_weight.weight_tonnes = 0.;
        assert_eq!(
            registry.add_train(zero_weight),
            Err(RequestError::NonPositive("weight"))
        );

        let mut negative_speed = request();
        negative_speed.speed_kmh = -5.;
        assert_eq!(
            registry.add_train(negative_speed),
            Err(RequestError::NonPositive("speed"))
        );

        assert!(registry.trains.is_empty());
    }

    #[test]
    fn same_station_leg_is_accepted_at_this_layer() {
        let mut registry = TrainRegistry::default();
        let mut loopback = request();
        loopback.to = loopback.from.clone();
        assert!(registry.add_train(loopback).is_ok());
    }
}
