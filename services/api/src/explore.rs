use clap::{Args, ValueEnum};
use showroom::config::AppConfig;
use showroom::error::AppError;
use showroom::workflows::explore::{
    ExploreFeed, GestureOutcome, InventoryImporter, PointerSample, SwipeAxis, SwipeDirection,
    Vehicle,
};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Args, Debug)]
pub(crate) struct ExploreArgs {
    /// Inventory CSV export. A small built-in lot is used when omitted.
    #[arg(long)]
    pub(crate) inventory: Option<PathBuf>,
    /// Category to open the deck on (defaults to the first, "Todos")
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Swipe axis of the deck
    #[arg(long, value_enum, default_value_t = AxisArg::Horizontal)]
    pub(crate) axis: AxisArg,
    /// Comma-separated script: left, right, up, down, tap, restart,
    /// category=<name>, or drag=<dx>:<dy>:<vx>:<vy>
    #[arg(long, value_delimiter = ',', value_parser = ExploreStep::from_str)]
    pub(crate) script: Vec<ExploreStep>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum AxisArg {
    Horizontal,
    Vertical,
}

impl From<AxisArg> for SwipeAxis {
    fn from(value: AxisArg) -> Self {
        match value {
            AxisArg::Horizontal => SwipeAxis::Horizontal,
            AxisArg::Vertical => SwipeAxis::Vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExploreStep {
    Button(SwipeDirection),
    Tap,
    Drag { dx: f32, dy: f32, vx: f32, vy: f32 },
    Category(String),
    Restart,
}

impl FromStr for ExploreStep {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let step = raw.trim();
        match step.to_ascii_lowercase().as_str() {
            "left" => return Ok(Self::Button(SwipeDirection::Left)),
            "right" => return Ok(Self::Button(SwipeDirection::Right)),
            "up" => return Ok(Self::Button(SwipeDirection::Up)),
            "down" => return Ok(Self::Button(SwipeDirection::Down)),
            "tap" => return Ok(Self::Tap),
            "restart" => return Ok(Self::Restart),
            _ => {}
        }

        if let Some(name) = step.strip_prefix("category=") {
            return Ok(Self::Category(name.to_string()));
        }

        if let Some(values) = step.strip_prefix("drag=") {
            let parsed: Result<Vec<f32>, _> = values.split(':').map(|v| v.trim().parse::<f32>()).collect();
            return match parsed.as_deref() {
                Ok([dx, dy, vx, vy]) => Ok(Self::Drag {
                    dx: *dx,
                    dy: *dy,
                    vx: *vx,
                    vy: *vy,
                }),
                _ => Err(format!("'{step}' must look like drag=<dx>:<dy>:<vx>:<vy>")),
            };
        }

        Err(format!("unknown explore step '{step}'"))
    }
}

pub(crate) fn run_explore(args: ExploreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mut deck_config = config.deck;
    deck_config.axis = args.axis.into();

    let vehicles = match &args.inventory {
        Some(path) => InventoryImporter::from_path(path)?,
        None => demo_inventory(),
    };

    let mut feed = ExploreFeed::new(vehicles, deck_config);
    println!("Categories: {}", feed.categories().join(", "));
    if let Some(category) = &args.category {
        if !feed.select_category_named(category) {
            println!("Unknown category '{category}', staying on {}", feed.current_category());
        }
    }
    render_top(&feed);

    for step in &args.script {
        apply_step(&mut feed, step);
        feed.flush();
        render_top(&feed);
    }

    let ledger = feed.ledger();
    println!("\nFavorites ({})", ledger.favorites().len());
    for id in ledger.favorites() {
        println!("- {id}");
    }
    println!("Passed: {}", ledger.passed().len());
    Ok(())
}

fn apply_step(feed: &mut ExploreFeed, step: &ExploreStep) {
    match step {
        ExploreStep::Button(direction) => match feed.controller_mut().swipe(*direction) {
            Ok(index) => println!("> {} swiped card {index}", direction.label()),
            Err(rejected) => println!("> {} ignored: {rejected}", direction.label()),
        },
        ExploreStep::Tap => {
            let Some(index) = feed.controller().deck().top_index() else {
                println!("> tap ignored: deck is empty");
                return;
            };
            let outcome = feed.controller_mut().pointer(index, PointerSample::tap());
            println!("> tap on card {index}: {}", describe(&outcome));
        }
        ExploreStep::Drag { dx, dy, vx, vy } => {
            let Some(index) = feed.controller().deck().top_index() else {
                println!("> drag ignored: deck is empty");
                return;
            };
            let controller = feed.controller_mut();
            controller.pointer(index, PointerSample::drag(*dx, *dy));
            let outcome = controller.pointer(index, PointerSample::release(*dx, *dy, *vx, *vy));
            println!("> drag ({dx}, {dy}) at ({vx}, {vy}) on card {index}: {}", describe(&outcome));
        }
        ExploreStep::Category(name) => {
            if feed.select_category_named(name) {
                println!("> category {}", feed.current_category());
            } else {
                println!("> unknown category '{name}'");
            }
        }
        ExploreStep::Restart => {
            feed.restart();
            println!("> restarted on {}", feed.current_category());
        }
    }
}

fn describe(outcome: &GestureOutcome) -> String {
    match outcome {
        GestureOutcome::Follow(_) => "following".to_string(),
        GestureOutcome::Tap => "next photo".to_string(),
        GestureOutcome::Commit(direction) => format!("swiped {}", direction.label()),
        GestureOutcome::Cancel(_) => "snapped back".to_string(),
        GestureOutcome::Ignored => "ignored".to_string(),
    }
}

fn render_top(feed: &ExploreFeed) {
    let deck = feed.controller().deck();
    match deck.visible_cards().first() {
        Some(card) => {
            let price = card
                .item
                .price
                .map(|price| format!("${price}"))
                .unwrap_or_else(|| "price on request".to_string());
            println!(
                "  [{}] {} ({price}) photo {}/{} {} | {} left",
                feed.current_category(),
                card.item.title,
                card.media_cursor + 1,
                card.media_count,
                card.media,
                deck.remaining()
            );
        }
        None => println!("  [{}] no more vehicles", feed.current_category()),
    }
}

fn vehicle(id: &str, title: &str, year: u16, price: u32, class: &str, photos: usize) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        slug: title.to_ascii_lowercase().replace(' ', "-"),
        title: title.to_string(),
        year: Some(year),
        mileage: Some(35_000),
        price: Some(price),
        classifications: vec![class.to_string()],
        feature_images: vec![format!("https://cdn.example.com/{id}/feature.jpg")],
        exterior_gallery: (1..photos)
            .map(|n| format!("https://cdn.example.com/{id}/exterior-{n}.jpg"))
            .collect(),
        interior_gallery: Vec::new(),
    }
}

pub(crate) fn demo_inventory() -> Vec<Vehicle> {
    vec![
        vehicle("v-100", "Mazda CX-5 2021", 2021, 389_000, "SUV", 3),
        vehicle("v-101", "Nissan Versa 2020", 2020, 229_000, "Sedán", 2),
        vehicle("v-102", "Toyota Hilux 2019", 2019, 459_000, "Pick Up", 4),
        vehicle("v-103", "Kia Rio 2022", 2022, 279_000, "Hatchback", 1),
        vehicle("v-104", "Honda CR-V 2020", 2020, 419_000, "SUV", 2),
        vehicle("v-105", "Chevrolet Cavalier 2021", 2021, 245_000, "Sedán", 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom::workflows::explore::DeckConfig;

    #[test]
    fn parses_script_steps() {
        assert_eq!("Right".parse::<ExploreStep>(), Ok(ExploreStep::Button(SwipeDirection::Right)));
        assert_eq!(
            "category=Pick Up".parse::<ExploreStep>(),
            Ok(ExploreStep::Category("Pick Up".to_string()))
        );
        assert_eq!(
            "drag=-150:0:0.1:0".parse::<ExploreStep>(),
            Ok(ExploreStep::Drag {
                dx: -150.0,
                dy: 0.0,
                vx: 0.1,
                vy: 0.0
            })
        );
        assert!("drag=1:2".parse::<ExploreStep>().is_err());
        assert!("spin".parse::<ExploreStep>().is_err());
    }

    #[test]
    fn scripted_session_saves_favorites() {
        let mut feed = ExploreFeed::new(demo_inventory(), DeckConfig::default());
        apply_step(&mut feed, &ExploreStep::Category("SUV".to_string()));
        apply_step(
            &mut feed,
            &ExploreStep::Drag {
                dx: 180.0,
                dy: 0.0,
                vx: 0.2,
                vy: 0.0,
            },
        );
        apply_step(&mut feed, &ExploreStep::Button(SwipeDirection::Left));
        feed.flush();

        assert!(feed.ledger().is_favorite("v-100"));
        assert_eq!(feed.ledger().passed().to_vec(), vec!["v-104".to_string()]);
        assert!(feed.controller().deck().is_exhausted());
    }
}
