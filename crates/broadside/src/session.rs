//! Per-client room session.
//!
//! A [`RoomSession`] is one player's handle on a shared room: it knows
//! who the player is, which slot they hold, and how to reach the store.
//! There is no referee process anywhere — every rule is enforced by
//! running the pure rules functions inside store transactions, so any
//! client's session arrives at the same decisions as its opponent's.
//!
//! Fleet placement is local until confirmed: the draft board lives in
//! the session and only [`confirm_setup`](RoomSession::confirm_setup)
//! publishes it to the document.

use broadside_model::{
    apply_all, Direction, Player, Room, RoomCode, RoomPatch, RoomStatus, Ship, ShipClass, Slot,
};
use broadside_game::{fleet, machine, shot, ShotResult};
use broadside_store::{
    IdentityProvider, RoomStore, RoomWatch, StoreError, Tx, TxOutcome, UserProfile,
};

use crate::{lobby, view, BroadsideError, GameView};

/// One player's live connection to a room.
pub struct RoomSession<S: RoomStore> {
    store: S,
    code: RoomCode,
    profile: UserProfile,
    slot: Slot,
    /// Local, unpublished fleet placement.
    draft: Vec<Ship>,
}

impl<S: RoomStore> RoomSession<S> {
    /// Creates a new room and seats the current user as its host.
    pub async fn host(
        store: S,
        identity: &impl IdentityProvider,
    ) -> Result<Self, BroadsideError> {
        let profile = identity
            .current_user()
            .await
            .ok_or(BroadsideError::Anonymous)?;
        let code = lobby::create_room(&store, &profile).await?;
        Ok(Self {
            store,
            code,
            profile,
            slot: Slot::Player1,
            draft: Vec::new(),
        })
    }

    /// Joins (or re-attaches to) an existing room by code.
    pub async fn join(
        store: S,
        code: RoomCode,
        identity: &impl IdentityProvider,
    ) -> Result<Self, BroadsideError> {
        let profile = identity
            .current_user()
            .await
            .ok_or(BroadsideError::Anonymous)?;
        let slot = lobby::join_room(&store, &code, &profile).await?;
        Ok(Self {
            store,
            code,
            profile,
            slot,
            draft: Vec::new(),
        })
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The unpublished draft fleet.
    pub fn draft(&self) -> &[Ship] {
        &self.draft
    }

    // -----------------------------------------------------------------
    // Setup phase
    // -----------------------------------------------------------------

    /// Places (or re-places) a ship on the local draft board.
    ///
    /// Placing a class that is already drafted moves that ship; the
    /// new position is validated against the rest of the draft.
    pub fn place_ship(
        &mut self,
        class: ShipClass,
        anchor: usize,
        direction: Direction,
    ) -> Result<(), BroadsideError> {
        let others: Vec<Ship> = self
            .draft
            .iter()
            .filter(|ship| ship.class != class)
            .cloned()
            .collect();
        let ship = fleet::place(&others, class, anchor, direction)?;
        self.draft = others;
        self.draft.push(ship);
        Ok(())
    }

    /// Clears the local draft board.
    pub fn reset_board(&mut self) {
        self.draft.clear();
    }

    /// Publishes the draft fleet to the room document.
    ///
    /// The fleet must be complete and valid; the room must be in setup.
    /// A ready player's fleet is locked — ships are written here once
    /// and never change until a rematch reset. Withdraw readiness first
    /// to re-confirm.
    pub async fn confirm_setup(&self) -> Result<(), BroadsideError> {
        fleet::validate_fleet(&self.draft)?;
        let slot = self.slot;
        let ships = self.draft.clone();
        self.transact(move |room| {
            if room.status != RoomStatus::Prepare {
                return Err(BroadsideError::Conflict("setup is not open"));
            }
            if room.player(slot).ready {
                return Err(BroadsideError::Conflict("fleet is locked while ready"));
            }
            Ok(vec![RoomPatch::Ships(slot, ships.clone())])
        })
        .await?;
        tracing::info!(code = %self.code, slot = %self.slot, "fleet confirmed");
        Ok(())
    }

    /// Marks this player ready. When the opponent is already ready with
    /// a valid fleet, the same transaction starts the match, so the
    /// `prepare → playing` flip rides on the second ready and can never
    /// fire twice.
    pub async fn set_ready(&self) -> Result<(), BroadsideError> {
        let slot = self.slot;
        let room = self
            .transact(move |room| {
                if room.status != RoomStatus::Prepare {
                    return Err(BroadsideError::Conflict("setup is not open"));
                }
                fleet::validate_fleet(&room.player(slot).ships)?;
                let mut patches = vec![RoomPatch::Ready(slot, true)];
                let mut after = room.clone();
                apply_all(&mut after, &patches);
                if let Some(start) = machine::begin_playing(&after) {
                    patches.extend(start);
                }
                Ok(patches)
            })
            .await?;
        if room.status == RoomStatus::Playing {
            tracing::info!(code = %self.code, "match started");
        }
        Ok(())
    }

    /// Withdraws readiness while the room is still in setup.
    pub async fn clear_ready(&self) -> Result<(), BroadsideError> {
        let slot = self.slot;
        self.transact(move |room| {
            if room.status != RoomStatus::Prepare {
                return Err(BroadsideError::Conflict("setup is not open"));
            }
            Ok(vec![RoomPatch::Ready(slot, false)])
        })
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Host-only: closes the lobby and opens setup. Requires both slots
    /// occupied.
    pub async fn start_prepare(&self) -> Result<(), BroadsideError> {
        let uid = self.profile.uid.clone();
        self.transact(move |room| {
            if room.host != uid {
                return Err(BroadsideError::NotHost);
            }
            machine::open_prepare(room)
                .ok_or(BroadsideError::Conflict("room is not full and waiting"))
        })
        .await?;
        tracing::info!(code = %self.code, "setup opened");
        Ok(())
    }

    /// Resets a finished room for another match. Either player may ask.
    pub async fn rematch(&mut self) -> Result<(), BroadsideError> {
        self.transact(|room| {
            machine::reset_for_rematch(room)
                .ok_or(BroadsideError::Conflict("no finished match to reset"))
        })
        .await?;
        self.draft.clear();
        tracing::info!(code = %self.code, "rematch started");
        Ok(())
    }

    /// Vacates this player's slot.
    ///
    /// A departing host hands the room to the remaining occupant, and
    /// leaving mid-match ends it.
    pub async fn leave(self) -> Result<(), BroadsideError> {
        let slot = self.slot;
        let uid = self.profile.uid.clone();
        self.transact(move |room| {
            if room.slot_of(&uid) != Some(slot) {
                return Err(BroadsideError::Conflict("not seated in this room"));
            }
            let other = slot.opposite();
            let mut patches = vec![RoomPatch::Player(slot, Player::vacant())];
            if room.host == uid {
                if let Some(next_host) = room.uid_of(other) {
                    patches.push(RoomPatch::Host(next_host.clone()));
                }
            }
            if room.current_turn.as_ref() == Some(&uid) {
                patches.push(RoomPatch::CurrentTurn(room.uid_of(other).cloned()));
            }
            if room.status == RoomStatus::Playing {
                patches.push(RoomPatch::Status(RoomStatus::Finished));
            }
            Ok(patches)
        })
        .await?;
        tracing::info!(code = %self.code, slot = %self.slot, "player left");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Battle phase
    // -----------------------------------------------------------------

    /// Fires at a cell of the opponent's board.
    ///
    /// The whole shot — rules check, hit/miss record, turn handoff, and
    /// (for a killing shot) the `playing → finished` flip — commits as
    /// one transaction. Two clients racing on the same cell serialize:
    /// one commits, the other resolves against the updated document and
    /// is rejected.
    pub async fn fire(&self, index: usize) -> Result<ShotResult, BroadsideError> {
        let slot = self.slot;
        let mut accepted: Option<ShotResult> = None;
        self.transact(|room| {
            let result = shot::resolve(room, slot, index)?;
            let mut patches = result.patches.clone();
            let mut after = room.clone();
            apply_all(&mut after, &patches);
            if let Some(finish) = machine::finish(&after) {
                patches.extend(finish);
            }
            accepted = Some(result);
            Ok(patches)
        })
        .await?;
        let result = accepted.ok_or(BroadsideError::Store(StoreError::Aborted))?;
        tracing::info!(
            code = %self.code,
            cell = index,
            outcome = ?result.outcome,
            sunk = ?result.sunk,
            "shot committed"
        );
        Ok(result)
    }

    // -----------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------

    /// Reads the room, applies any pending automatic transition, and
    /// returns this player's view.
    ///
    /// Every client runs the same derivation on every snapshot; the
    /// transition commits at most once because the builders re-check
    /// their status guard against the transaction-fresh document.
    pub async fn sync(&self) -> Result<GameView, BroadsideError> {
        let mut room = self.store.read(&self.code).await?;
        if pending_transition(&room).is_some() {
            let outcome = self
                .store
                .transact(&self.code, |fresh| match pending_transition(fresh) {
                    Some(patches) => Tx::Commit(patches),
                    None => Tx::Abort,
                })
                .await?;
            room = match outcome {
                TxOutcome::Committed(fresh) => fresh,
                // Another client applied it first.
                TxOutcome::Aborted => self.store.read(&self.code).await?,
            };
        }
        Ok(view::render(&room, self.slot))
    }

    /// Subscribes to the room document.
    pub async fn watch(&self) -> Result<RoomWatch, BroadsideError> {
        Ok(self.store.subscribe(&self.code).await?)
    }

    /// Projects an already-fetched document (e.g. from a watch) into
    /// this player's view.
    pub fn project(&self, room: &Room) -> GameView {
        view::render(room, self.slot)
    }

    /// Runs `decide` in a store transaction, committing its patches or
    /// surfacing its typed rejection.
    async fn transact<F>(&self, mut decide: F) -> Result<Room, BroadsideError>
    where
        F: FnMut(&Room) -> Result<Vec<RoomPatch>, BroadsideError> + Send,
    {
        let mut rejection: Option<BroadsideError> = None;
        let outcome = self
            .store
            .transact(&self.code, |room| match decide(room) {
                Ok(patches) => Tx::Commit(patches),
                Err(err) => {
                    rejection = Some(err);
                    Tx::Abort
                }
            })
            .await?;
        match outcome {
            TxOutcome::Committed(room) => Ok(room),
            TxOutcome::Aborted => {
                Err(rejection.unwrap_or(BroadsideError::Store(StoreError::Aborted)))
            }
        }
    }
}

/// The automatic transition the document is currently due for, if any.
fn pending_transition(room: &Room) -> Option<Vec<RoomPatch>> {
    machine::begin_playing(room).or_else(|| machine::finish(room))
}
