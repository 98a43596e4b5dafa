//! Scripted local match: two sessions on one in-memory store play a
//! full game, printing both players' views as it goes.
//!
//! Run with `RUST_LOG=debug` to watch the store traffic.

use broadside::{
    grid, BroadsideError, CellView, Direction, GameView, MemoryStore, RoomSession, RoomStatus,
    ShipClass, ShotError, StaticIdentity,
};

// ---------------------------------------------------------------------------
// Fleet layouts
// ---------------------------------------------------------------------------

const ALICE_FLEET: [(ShipClass, usize, Direction); 4] = [
    (ShipClass::Small, 0, Direction::Horizontal),
    (ShipClass::Medium, 20, Direction::Horizontal),
    (ShipClass::Large, 40, Direction::Horizontal),
    (ShipClass::Xlarge, 60, Direction::Horizontal),
];

const BOB_FLEET: [(ShipClass, usize, Direction); 4] = [
    (ShipClass::Small, 5, Direction::Vertical),
    (ShipClass::Medium, 30, Direction::Vertical),
    (ShipClass::Large, 77, Direction::Horizontal),
    (ShipClass::Xlarge, 44, Direction::Vertical),
];

fn place_fleet(
    session: &mut RoomSession<MemoryStore>,
    fleet: &[(ShipClass, usize, Direction)],
) -> Result<(), BroadsideError> {
    for &(class, anchor, direction) in fleet {
        session.place_ship(class, anchor, direction)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn cell_char(cell: CellView) -> char {
    match cell {
        CellView::Empty => '.',
        CellView::Ship => '#',
        CellView::Hit => 'x',
        CellView::Sunk => 'X',
        CellView::Miss => 'o',
    }
}

fn print_view(label: &str, view: &GameView) {
    println!("--- {label} (status: {}) ---", view.status);
    println!("{:<12}  {:<12}", "own", "targeting");
    for row in 0..grid::GRID_WIDTH {
        let mut own = String::new();
        let mut target = String::new();
        for col in 0..grid::GRID_WIDTH {
            let idx = grid::index_of(row, col);
            own.push(cell_char(view.own_board[idx]));
            target.push(cell_char(view.target_board[idx]));
        }
        println!("{own}  {target}");
    }
}

// ---------------------------------------------------------------------------
// Match script
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = MemoryStore::new();
    let alice = StaticIdentity::new("alice-uid", "Alice");
    let bob = StaticIdentity::new("bob-uid", "Bob");

    let mut host = RoomSession::host(store.clone(), &alice).await?;
    println!("room code: {}", host.code());
    let mut guest = RoomSession::join(store.clone(), host.code().clone(), &bob).await?;

    host.start_prepare().await?;
    place_fleet(&mut host, &ALICE_FLEET)?;
    place_fleet(&mut guest, &BOB_FLEET)?;
    host.confirm_setup().await?;
    guest.confirm_setup().await?;
    host.set_ready().await?;
    guest.set_ready().await?;
    println!("both fleets confirmed, match on");

    // Alice sweeps the board top-down, Bob bottom-up. Every cell is
    // visited at most once per player, so the loop always terminates.
    let mut alice_scan = 0..grid::GRID_CELLS;
    let mut bob_scan = (0..grid::GRID_CELLS).rev();

    loop {
        let view = host.sync().await?;
        if view.status == RoomStatus::Finished {
            break;
        }
        let (session, scan): (&RoomSession<MemoryStore>, &mut dyn Iterator<Item = usize>) =
            if view.my_turn {
                (&host, &mut alice_scan)
            } else {
                (&guest, &mut bob_scan)
            };
        let cell = scan.next().ok_or("both players ran out of cells")?;
        match session.fire(cell).await {
            Ok(shot) => {
                if let Some(class) = shot.sunk {
                    println!(
                        "{} sank a {class} at cell {cell}",
                        session.profile().display_name
                    );
                }
            }
            Err(BroadsideError::Shot(ShotError::GameOver)) => break,
            Err(err) => return Err(err.into()),
        }
    }

    let final_host = host.sync().await?;
    let final_guest = guest.sync().await?;
    print_view("Alice", &final_host);
    print_view("Bob", &final_guest);

    match final_host.winner {
        Some(slot) if slot == host.slot() => println!("Alice wins!"),
        Some(_) => println!("Bob wins!"),
        None => println!("no winner recorded"),
    }
    Ok(())
}
