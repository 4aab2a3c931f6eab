//! The authoritative turn/phase state machine.
//!
//! All mutation flows through here: clicks resolved by the rendering layer
//! arrive as [`ClickTarget`]s, the primary control arrives as
//! [`ClickTarget::Control`], and every state change is announced through the
//! [`Signals`] hub. Illegal attempts are not errors - dispatch simply reports
//! the click unhandled and leaves the state untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::board::{Board, CellId, ConnectorId, NodeId, PlayerId, TopologyError};
use crate::cards::{costs, CardId, Resource, Terrain};
use crate::events::{
    CellChange, ClickTarget, ConnectorChange, GameChange, NodeChange, PlayerChange, Signals,
};
use crate::layout::BoardLayout;
use crate::player::Player;

/// Hand size at which a rolled seven forces a discard.
pub const DISCARD_THRESHOLD: usize = 8;

/// The game phases. Exactly one is active; it decides which entities are
/// legally selectable. There is no terminal phase - turns loop indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    SetupVillage,
    SetupRoad,
    Turn,
    RobberDiscard,
    RobberPlace,
}

/// What the primary control currently invokes (or, for the disabled entries,
/// what the game is waiting for). The control table over this enum lives in
/// [`crate::control`] and is exhaustive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    BuildVillage,
    BuildRoad,
    RollDice,
    NextTurn,
    SelectCards,
    DiscardCards,
    PlaceRobber,
}

/// Construction-time failures. In-game rule violations never surface here;
/// click dispatch reports those unhandled instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player count {0} is outside the supported 2-6 range")]
    PlayerCount(u8),

    #[error("first player {first} does not have a seat in a {players}-player game")]
    FirstPlayer { first: PlayerId, players: u8 },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Game parameters. The seed makes dice and shuffles reproducible; leaving it
/// unset draws one from thread entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: u8,
    pub first_player: PlayerId,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 4,
            first_player: 1,
            seed: None,
        }
    }
}

const SETUP_ORDERS: [&[u8]; 5] = [
    &[0, 1, 1, 0],
    &[0, 1, 2, 2, 1, 0],
    &[0, 1, 2, 3, 3, 2, 1, 0],
    &[0, 1, 2, 3, 4, 4, 3, 2, 1, 0],
    &[0, 1, 2, 3, 4, 5, 5, 4, 3, 2, 1, 0],
];

/// Snake-draft seat offsets for the setup loop, indexed by the setup-turn
/// counter: every seat places once ascending, then once descending.
pub fn setup_order(players: u8) -> &'static [u8] {
    debug_assert!((2..=6).contains(&players));
    SETUP_ORDERS[players as usize - 2]
}

/// The aggregate root: board, players, dice, counters, and the signal hub.
#[derive(Debug, Serialize)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    dice: Option<(u8, u8)>,
    phase: Phase,
    action: PendingAction,
    first_player: PlayerId,
    /// Denormalized mirror of [`Game::current_player`], kept only so the
    /// change can be announced; never consulted for rules.
    current: PlayerId,
    setup_turn: usize,
    robber_turn: usize,
    turn: usize,
    seed: u64,
    #[serde(skip)]
    signals: Signals,
    #[serde(skip)]
    rng: StdRng,
}

impl Game {
    /// A game on the fixed standard board.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_layout(config, &BoardLayout::standard())
    }

    /// A game on the given layout descriptors.
    pub fn with_layout(config: GameConfig, layout: &BoardLayout) -> Result<Self, GameError> {
        if !(2..=6).contains(&config.players) {
            return Err(GameError::PlayerCount(config.players));
        }
        if config.first_player < 1 || config.first_player > config.players {
            return Err(GameError::FirstPlayer {
                first: config.first_player,
                players: config.players,
            });
        }

        let board = Board::build(layout)?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());

        let mut game = Self {
            board,
            players: (1..=config.players).map(Player::new).collect(),
            dice: None,
            phase: Phase::SetupVillage,
            action: PendingAction::BuildVillage,
            first_player: config.first_player,
            current: config.first_player,
            setup_turn: 0,
            robber_turn: 0,
            turn: 0,
            seed,
            signals: Signals::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        game.refresh_selectable();
        debug!(
            players = config.players,
            first = config.first_player,
            seed,
            "game created"
        );
        Ok(game)
    }

    // ==================== Queries ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[Self::seat(id)]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn action(&self) -> PendingAction {
        self.action
    }

    pub fn dice(&self) -> Option<(u8, u8)> {
        self.dice
    }

    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    pub fn setup_turn(&self) -> usize {
        self.setup_turn
    }

    pub fn robber_turn(&self) -> usize {
        self.robber_turn
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Whose move it is, derived from phase and counters alone.
    ///
    /// During setup the snake-draft table supplies the seat offset; during the
    /// robber discards the robber-turn counter walks every seat once; during
    /// regular play (and robber placement) the turn counter applies. The
    /// result always wraps into `1..=N`.
    pub fn current_player(&self) -> PlayerId {
        let n = self.players.len();
        let offset = match self.phase {
            Phase::SetupVillage | Phase::SetupRoad => {
                setup_order(n as u8)[self.setup_turn] as usize
            }
            Phase::RobberDiscard => self.robber_turn,
            Phase::Turn | Phase::RobberPlace => self.turn,
        };
        ((self.first_player as usize - 1 + offset) % n) as PlayerId + 1
    }

    // ==================== Build legality ====================

    /// May the current player put a village on this node right now?
    pub fn can_build_village(&self, node: NodeId) -> bool {
        let site = self.board.node(node);
        if site.owner.is_some() {
            return false;
        }
        let area_free = site
            .siblings()
            .iter()
            .all(|&s| self.board.node(s).owner.is_none());

        match self.phase {
            Phase::SetupVillage => area_free,
            Phase::Turn => {
                let player = self.player(self.current_player());
                player.villages_remaining > 0
                    && player.hand.has_cards(&costs::village())
                    && area_free
                    && site
                        .connectors()
                        .iter()
                        .any(|&c| self.board.connector(c).owner == Some(player.id))
            }
            Phase::SetupRoad | Phase::RobberDiscard | Phase::RobberPlace => false,
        }
    }

    /// May the current player put a road on this connector right now?
    pub fn can_build_road(&self, connector: ConnectorId) -> bool {
        let site = self.board.connector(connector);
        if site.owner.is_some() {
            return false;
        }

        match self.phase {
            Phase::SetupRoad => {
                let player = self.player(self.current_player());
                match player.setup_node {
                    Some(node) => site.nodes().contains(&node),
                    None => false,
                }
            }
            Phase::Turn => {
                let pid = self.current_player();
                let player = self.player(pid);
                if player.roads_remaining == 0 || !player.hand.has_cards(&costs::road()) {
                    return false;
                }
                site.nodes().iter().any(|&endpoint| {
                    let node = self.board.node(endpoint);
                    node.owner == Some(pid)
                        || node
                            .connectors()
                            .iter()
                            .any(|&c| self.board.connector(c).owner == Some(pid))
                })
            }
            Phase::SetupVillage | Phase::RobberDiscard | Phase::RobberPlace => false,
        }
    }

    // ==================== Mutations ====================

    /// Place a village if legal. Returns whether anything happened.
    pub fn build_village(&mut self, node: NodeId) -> bool {
        if !self.can_build_village(node) {
            return false;
        }
        let pid = self.current_player();
        self.board.claim_node(node, pid);

        let in_setup = self.phase == Phase::SetupVillage;
        let player = &mut self.players[Self::seat(pid)];
        player.villages_remaining -= 1;
        if in_setup {
            player.setup_node = Some(node);
        } else {
            player.hand.use_cards(&costs::village());
        }

        debug!(player = pid, node = node.0, "village built");
        self.signals.nodes.fire(&NodeChange { node });
        self.signals.players.fire(&PlayerChange::State { player: pid });

        if in_setup {
            self.next_turn();
        } else {
            self.refresh_selectable();
        }
        true
    }

    /// Place a road if legal. Returns whether anything happened.
    pub fn build_road(&mut self, connector: ConnectorId) -> bool {
        if !self.can_build_road(connector) {
            return false;
        }
        let pid = self.current_player();
        self.board.claim_connector(connector, pid);

        let in_setup = self.phase == Phase::SetupRoad;
        let player = &mut self.players[Self::seat(pid)];
        player.roads_remaining -= 1;
        if in_setup {
            player.setup_node = None;
        } else {
            player.hand.use_cards(&costs::road());
        }

        debug!(player = pid, connector = connector.0, "road built");
        self.signals.connectors.fire(&ConnectorChange { connector });
        self.signals.players.fire(&PlayerChange::State { player: pid });

        if in_setup {
            self.next_turn();
        } else {
            self.refresh_selectable();
        }
        true
    }

    /// Route a resolved click to the phase-appropriate handler. Returns true
    /// if the click did something; illegal attempts are silently ignored.
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Node(node) => self.build_village(node),
            ClickTarget::Connector(connector) => self.build_road(connector),
            ClickTarget::Cell(cell) => self.place_robber(cell),
            ClickTarget::Control => self.do_action(),
        }
    }

    /// Invoke whatever the primary control is currently bound to. Presses
    /// while the control is disabled report unhandled.
    pub fn do_action(&mut self) -> bool {
        match self.action {
            PendingAction::RollDice => {
                self.throw_dice();
                true
            }
            PendingAction::NextTurn => {
                self.next_turn();
                true
            }
            PendingAction::DiscardCards => {
                self.confirm_discard();
                true
            }
            PendingAction::BuildVillage
            | PendingAction::BuildRoad
            | PendingAction::SelectCards
            | PendingAction::PlaceRobber => false,
        }
    }

    /// Roll two dice from the injected rng and resolve the sum.
    pub fn throw_dice(&mut self) {
        let die_one = self.rng.gen_range(1..=6);
        let die_two = self.rng.gen_range(1..=6);
        self.resolve_dice(die_one, die_two);
    }

    /// Resolve a concrete pair of die faces. Split from [`Game::throw_dice`]
    /// so tests can feed deterministic sequences. A seven engages the robber
    /// before any distribution happens; anything else pays out and hands the
    /// control over to ending the turn.
    pub fn resolve_dice(&mut self, die_one: u8, die_two: u8) {
        if self.phase != Phase::Turn || self.action != PendingAction::RollDice {
            return;
        }
        self.dice = Some((die_one, die_two));
        self.signals.game.fire(&GameChange::Dice(die_one, die_two));

        let total = die_one + die_two;
        debug!(die_one, die_two, total, "dice resolved");
        if total == 7 {
            self.handle_robber();
        } else {
            self.distribute(total);
            self.set_action(PendingAction::NextTurn);
            self.after_transition();
        }
    }

    /// Pay one card of the cell's resource to the owner of every village
    /// adjacent to a cell producing on this sum. The robber's cell never
    /// produces.
    fn distribute(&mut self, total: u8) {
        let mut grants: Vec<(PlayerId, Resource)> = Vec::new();
        for (_, cell) in self.board.cells_with_roll(total) {
            if cell.has_robber {
                continue;
            }
            let resource = match cell.terrain.resource() {
                Some(r) => r,
                None => continue,
            };
            for &node in cell.nodes() {
                if let Some(owner) = self.board.node(node).owner {
                    // TODO: grant a second card here once city building lands.
                    grants.push((owner, resource));
                }
            }
        }
        for (player, resource) in grants {
            self.draw_card(player, resource);
        }
    }

    /// Put a card of the given resource into a player's hand and announce it.
    pub fn draw_card(&mut self, player: PlayerId, resource: Resource) -> CardId {
        let card = self.players[Self::seat(player)].hand.draw(resource);
        self.signals
            .players
            .fire(&PlayerChange::CardDrawn { player, card });
        self.signals.players.fire(&PlayerChange::State { player });
        card
    }

    fn handle_robber(&mut self) {
        debug!("seven rolled, robber engaged");
        self.set_phase(Phase::RobberDiscard);
        self.robber_turn = 0;
        self.enter_discard_slot();
    }

    /// Walk the robber-turn counter forward until a player over the discard
    /// threshold is found (they get the selection sub-state) or every seat
    /// has been visited (robber placement begins).
    fn enter_discard_slot(&mut self) {
        let n = self.players.len();
        while self.robber_turn < n {
            let pid = self.current_player();
            if self.player(pid).hand.len() >= DISCARD_THRESHOLD {
                self.players[Self::seat(pid)].hand.clear_selection();
                self.set_action(PendingAction::SelectCards);
                self.after_transition();
                return;
            }
            self.robber_turn += 1;
        }
        self.set_phase(Phase::RobberPlace);
        self.set_action(PendingAction::PlaceRobber);
        self.after_transition();
    }

    /// Confirm the discard selection: remove the selected half of the hand
    /// and advance the robber queue.
    fn confirm_discard(&mut self) {
        let pid = self.current_player();
        let removed = self.players[Self::seat(pid)].hand.discard_selected();
        debug!(player = pid, removed, "discard confirmed");
        self.signals.players.fire(&PlayerChange::State { player: pid });
        self.next_turn();
    }

    /// Flip a card's selection flag for the discarding player. Only live
    /// while the select/discard sub-state is active; the action label tracks
    /// whether exactly half the hand (rounded down) is selected.
    pub fn toggle_card(&mut self, card: CardId) -> bool {
        if !matches!(
            self.action,
            PendingAction::SelectCards | PendingAction::DiscardCards
        ) {
            return false;
        }
        let pid = self.current_player();
        let selected = match self.players[Self::seat(pid)].hand.toggle(card) {
            Some(state) => state,
            None => return false,
        };
        self.signals.players.fire(&PlayerChange::CardToggled {
            player: pid,
            card,
            selected,
        });

        let hand = &self.players[Self::seat(pid)].hand;
        let ready = hand.selected_count() == hand.len() / 2;
        self.set_action(if ready {
            PendingAction::DiscardCards
        } else {
            PendingAction::SelectCards
        });
        true
    }

    /// Move the robber to a new cell. Only live during robber placement; the
    /// target must be selectable (land, different from the current seat).
    pub fn place_robber(&mut self, cell: CellId) -> bool {
        if self.phase != Phase::RobberPlace {
            return false;
        }
        if cell == self.board.robber() || !self.board.cell(cell).selectable {
            return false;
        }
        let from = self.board.robber();
        self.board.move_robber(cell);
        debug!(from = from.0, to = cell.0, "robber placed");
        self.signals.cells.fire(&CellChange { cell: from });
        self.signals.cells.fire(&CellChange { cell });
        self.next_turn();
        true
    }

    /// The single phase-advance function. Every phase has exactly one
    /// deterministic successor; after the transition the buildable highlights
    /// are recomputed and the current-player mirror republished.
    pub fn next_turn(&mut self) {
        match self.phase {
            Phase::SetupVillage => {
                self.set_phase(Phase::SetupRoad);
                self.set_action(PendingAction::BuildRoad);
                self.after_transition();
            }
            Phase::SetupRoad => {
                self.setup_turn += 1;
                if self.setup_turn == setup_order(self.players.len() as u8).len() {
                    debug!("setup complete, regular turns begin");
                    self.set_phase(Phase::Turn);
                    self.turn = 0;
                    self.set_action(PendingAction::RollDice);
                } else {
                    self.set_phase(Phase::SetupVillage);
                    self.set_action(PendingAction::BuildVillage);
                }
                self.after_transition();
            }
            Phase::Turn => {
                self.turn += 1;
                self.dice = None;
                debug!(turn = self.turn, "turn advanced");
                self.set_action(PendingAction::RollDice);
                self.after_transition();
            }
            Phase::RobberDiscard => {
                self.robber_turn += 1;
                self.enter_discard_slot();
            }
            Phase::RobberPlace => {
                self.set_phase(Phase::Turn);
                self.set_action(PendingAction::NextTurn);
                self.after_transition();
            }
        }
    }

    // ==================== Internals ====================

    fn seat(id: PlayerId) -> usize {
        id as usize - 1
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.signals.game.fire(&GameChange::Phase(phase));
        }
    }

    fn set_action(&mut self, action: PendingAction) {
        if self.action != action {
            self.action = action;
            self.signals.game.fire(&GameChange::Action(action));
        }
    }

    fn after_transition(&mut self) {
        self.refresh_selectable();
        self.publish_current_player();
    }

    fn publish_current_player(&mut self) {
        let now = self.current_player();
        if now != self.current {
            self.current = now;
            self.signals.game.fire(&GameChange::CurrentPlayer(now));
        }
    }

    /// Recompute the selectable highlight on every entity for the active
    /// phase, announcing only the entities whose flag actually flipped.
    fn refresh_selectable(&mut self) {
        let node_flags: Vec<bool> = (0..self.board.nodes().len())
            .map(|i| self.can_build_village(NodeId(i)))
            .collect();
        let connector_flags: Vec<bool> = (0..self.board.connectors().len())
            .map(|i| self.can_build_road(ConnectorId(i)))
            .collect();
        let robber = self.board.robber();
        let placing = self.phase == Phase::RobberPlace;
        let cell_flags: Vec<bool> = self
            .board
            .cells()
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                placing && CellId(i) != robber && cell.terrain != Terrain::Ocean
            })
            .collect();

        for (i, want) in node_flags.into_iter().enumerate() {
            let id = NodeId(i);
            if self.board.node(id).selectable != want {
                self.board.set_node_selectable(id, want);
                self.signals.nodes.fire(&NodeChange { node: id });
            }
        }
        for (i, want) in connector_flags.into_iter().enumerate() {
            let id = ConnectorId(i);
            if self.board.connector(id).selectable != want {
                self.board.set_connector_selectable(id, want);
                self.signals.connectors.fire(&ConnectorChange { connector: id });
            }
        }
        for (i, want) in cell_flags.into_iter().enumerate() {
            let id = CellId(i);
            if self.board.cell(id).selectable != want {
                self.board.set_cell_selectable(id, want);
                self.signals.cells.fire(&CellChange { cell: id });
            }
        }
    }
}
