//! Demo board served on first start.

use chrono::{DateTime, Duration, Utc};

use crate::board::Board;
use crate::column::{Column, ColumnColor, ColumnId};
use crate::store::MemStore;
use crate::task::{Priority, Task, TaskId};

/// `(title, color, show_slider)` per column, in board order.
const COLUMNS: [(&str, ColumnColor, bool); 4] = [
    ("To Do", ColumnColor::Gray, true),
    ("In Development", ColumnColor::Blue, true),
    ("In Testing", ColumnColor::Orange, true),
    ("Done", ColumnColor::Green, false),
];

/// A seeded task. Position is derived from listing order per column.
struct SeedTask {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    column: u32,
    progress: u8,
    assignees: &'static str,
    age: Duration,
}

fn seed_tasks() -> [SeedTask; 9] {
    [
        SeedTask {
            title: "Redesign user dashboard",
            description: "Update the main dashboard layout and improve user experience",
            priority: Priority::High,
            column: 1,
            progress: 0,
            assignees: "",
            age: Duration::days(2),
        },
        SeedTask {
            title: "Update API documentation",
            description: "Review and update all API endpoints documentation",
            priority: Priority::Medium,
            column: 1,
            progress: 0,
            assignees: "",
            age: Duration::days(1),
        },
        SeedTask {
            title: "Setup testing environment",
            description: "Configure automated testing pipeline for the project",
            priority: Priority::Low,
            column: 3,
            progress: 4,
            assignees: "Evan P",
            age: Duration::hours(3),
        },
        SeedTask {
            title: "Implement user authentication",
            description: "Add JWT authentication and secure login flow",
            priority: Priority::High,
            column: 2,
            progress: 2,
            assignees: "Evan P",
            age: Duration::hours(2),
        },
        SeedTask {
            title: "Database optimization",
            description: "Optimize database queries and add proper indexing",
            priority: Priority::Medium,
            column: 2,
            progress: 1,
            assignees: "Evan P",
            age: Duration::days(1),
        },
        SeedTask {
            title: "Setup project structure",
            description: "Initialize the project with all necessary dependencies",
            priority: Priority::Low,
            column: 4,
            progress: 5,
            assignees: "Evan P",
            age: Duration::days(3),
        },
        SeedTask {
            title: "Design wireframes",
            description: "Create initial wireframes for the application",
            priority: Priority::Medium,
            column: 4,
            progress: 5,
            assignees: "Evan P",
            age: Duration::days(2),
        },
        SeedTask {
            title: "Setup Git repository",
            description: "Initialize version control and setup the remote repository",
            priority: Priority::Low,
            column: 4,
            progress: 5,
            assignees: "Evan P",
            age: Duration::days(1),
        },
        SeedTask {
            title: "Research drag and drop libraries",
            description: "Evaluate different drag and drop solutions for the web client",
            priority: Priority::Medium,
            column: 4,
            progress: 4,
            assignees: "Evan P",
            age: Duration::zero(),
        },
    ]
}

/// Builds the demo board: four columns and nine tasks, all positions
/// contiguous. Task timestamps are backdated relative to `now`.
#[must_use]
pub fn demo_board_at(now: DateTime<Utc>) -> Board {
    let columns = COLUMNS
        .iter()
        .zip(0u32..)
        .map(|(&(title, color, show_slider), position)| Column {
            id: ColumnId::new(position + 1),
            title: title.to_string(),
            color,
            position,
            show_slider,
        });

    let mut next_position = [0u32; COLUMNS.len()];
    let tasks = seed_tasks().into_iter().zip(1u32..).map(|(seed, id)| {
        let slot = &mut next_position[(seed.column - 1) as usize];
        let position = *slot;
        *slot += 1;
        Task {
            id: TaskId::new(id),
            title: seed.title.to_string(),
            description: Some(seed.description.to_string()),
            priority: seed.priority,
            column_id: ColumnId::new(seed.column),
            position,
            progress: seed.progress,
            assignees: Some(seed.assignees.to_string()).filter(|a| !a.is_empty()),
            created_at: now - seed.age,
        }
    });

    Board::with_stores(
        MemStore::with_entities(columns),
        MemStore::with_entities(tasks.collect::<Vec<_>>()),
    )
}

/// Builds the demo board with timestamps relative to the current time.
#[must_use]
pub fn demo_board() -> Board {
    demo_board_at(Utc::now())
}
