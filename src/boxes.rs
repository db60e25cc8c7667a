use crate::error::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of boxes in the room, and of people outside it
pub const BOX_COUNT: u32 = 100;

/// Most boxes one person may open during a single visit
pub const OPEN_LIMIT: u32 = 50;

/// Game instances simulated by [`run_trials`]
pub const GAME_TRIALS: u32 = 10_000;

/// A room of closed boxes. The contents are a permutation of
/// `1..=BOX_COUNT`, fixed for the lifetime of the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxRoom {
    boxes: Vec<u32>,
}

impl BoxRoom {
    /// A room with uniformly shuffled contents
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut boxes: Vec<u32> = (1..=BOX_COUNT).collect();
        boxes.shuffle(rng);
        Self { boxes }
    }

    /// A room with the given contents, which must be a permutation
    /// of `1..=BOX_COUNT`
    pub fn from_contents(boxes: Vec<u32>) -> Result<Self> {
        let mut seen = [false; BOX_COUNT as usize];
        if boxes.len() != BOX_COUNT as usize {
            return Err(Error::InvalidPermutation { expected: BOX_COUNT });
        }
        for &content in &boxes {
            if content < 1 || content > BOX_COUNT || seen[content as usize - 1] {
                return Err(Error::InvalidPermutation { expected: BOX_COUNT });
            }
            seen[content as usize - 1] = true;
        }
        Ok(Self { boxes })
    }

    pub fn contents(&self) -> &[u32] {
        &self.boxes
    }

    /// Start a fresh visit with all boxes closed
    pub fn session(&self) -> Session<'_> {
        Session {
            room: self,
            opened: 0,
            last: None,
        }
    }

    /// Length of the longest cycle in the permutation. Everyone wins
    /// exactly when this does not exceed [`OPEN_LIMIT`].
    pub fn longest_cycle(&self) -> u32 {
        let mut visited = vec![false; self.boxes.len()];
        let mut longest = 0;
        for start in 0..self.boxes.len() {
            if visited[start] {
                continue;
            }
            let mut length = 0;
            let mut index = start;
            while !visited[index] {
                visited[index] = true;
                length += 1;
                index = self.boxes[index] as usize - 1;
            }
            longest = longest.max(length);
        }
        longest
    }
}

/// One person's visit to the room: how many boxes they have opened
/// and what they last read. Discarded when the person leaves.
#[derive(Debug)]
pub struct Session<'a> {
    room: &'a BoxRoom,
    opened: u32,
    last: Option<u32>,
}

impl Session<'_> {
    /// Open the box at `index` and read the number inside.
    ///
    /// A compliant strategy stops at the [`OPEN_LIMIT`] boundary on its
    /// own; hitting [`Error::OpenLimitExceeded`] here means the strategy
    /// is buggy, not that the person lost.
    pub fn open(&mut self, index: u32) -> Result<u32> {
        if self.opened >= OPEN_LIMIT {
            return Err(Error::OpenLimitExceeded { limit: OPEN_LIMIT });
        }
        let content = self
            .room
            .boxes
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidBoxIndex)?;
        self.opened += 1;
        self.last = Some(content);
        Ok(content)
    }

    pub fn opened(&self) -> u32 {
        self.opened
    }

    pub fn last(&self) -> Option<u32> {
        self.last
    }
}

/// A person assigned a number in `1..=BOX_COUNT`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Person {
    number: u32,
}

impl Person {
    pub fn new(number: u32) -> Self {
        Self { number }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Run the chain strategy for one visit: open the box at one's own
    /// number, then keep opening the box indexed by the number just
    /// read, until the own number turns up or the open budget is spent.
    pub fn finds_own_number(&self, room: &BoxRoom) -> Result<bool> {
        let mut session = room.session();
        let mut index = self.number - 1;
        while session.opened() < OPEN_LIMIT {
            let content = session.open(index)?;
            if content == self.number {
                return Ok(true);
            }
            index = content - 1;
        }
        Ok(false)
    }
}

/// One game: a fixed room and the full group of numbered people
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    room: BoxRoom,
    people: Vec<Person>,
}

impl Game {
    /// A game over a freshly shuffled room
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_room(BoxRoom::shuffled(rng))
    }

    /// A game over the given room
    pub fn with_room(room: BoxRoom) -> Self {
        Self {
            room,
            people: (1..=BOX_COUNT).map(Person::new).collect(),
        }
    }

    pub fn room(&self) -> &BoxRoom {
        &self.room
    }

    /// Whether one person finds their number within the open budget.
    /// Each call is a fresh visit; the boxes are closed in between.
    pub fn is_winner(&self, person: Person) -> Result<bool> {
        person.finds_own_number(&self.room)
    }

    /// How many of the people find their own number
    pub fn count_winners(&self) -> Result<u32> {
        let mut winners = 0;
        for &person in &self.people {
            if self.is_winner(person)? {
                winners += 1;
            }
        }
        Ok(winners)
    }
}

/// Aggregate over many independent games
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct GameStats {
    /// Games played
    games: u32,

    /// Games where every single person found their number
    all_found: u32,

    /// Winners summed over all games
    winners: u64,
}

impl GameStats {
    /// Record the winner count of one game
    pub fn record(&mut self, winners: u32) {
        self.games += 1;
        self.winners += u64::from(winners);
        if winners == BOX_COUNT {
            self.all_found += 1;
        }
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn all_found(&self) -> u32 {
        self.all_found
    }

    pub fn winners(&self) -> u64 {
        self.winners
    }

    /// Fraction of games where the whole group succeeded
    /// (about 0.31 for random permutations)
    pub fn all_found_ratio(&self) -> Result<f64> {
        if self.games == 0 {
            return Err(Error::NoQualifyingSamples);
        }
        Ok(self.all_found as f64 / self.games as f64)
    }

    /// Mean fraction of people finding their number per game
    /// (exactly 1/2 in expectation)
    pub fn mean_winner_ratio(&self) -> Result<f64> {
        if self.games == 0 {
            return Err(Error::NoQualifyingSamples);
        }
        Ok(self.winners as f64 / (self.games as f64 * BOX_COUNT as f64))
    }
}

/// Play `games` independent games, each over its own shuffled room
pub fn run_trials<R: Rng + ?Sized>(rng: &mut R, games: u32) -> Result<GameStats> {
    let mut stats = GameStats::default();
    for _ in 0..games {
        let game = Game::new(rng);
        stats.record(game.count_winners()?);
    }

    debug!(
        games,
        all_found = stats.all_found(),
        winners = stats.winners(),
        "box trials complete"
    );

    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // A permutation whose numbers 1..=length form one cycle, the rest
    // staying in place: box i holds i+2 up to the cycle end, which
    // holds 1.
    fn with_leading_cycle(length: u32) -> BoxRoom {
        let mut boxes: Vec<u32> = (1..=BOX_COUNT).collect();
        for i in 0..length as usize - 1 {
            boxes[i] = i as u32 + 2;
        }
        boxes[length as usize - 1] = 1;
        BoxRoom::from_contents(boxes).unwrap()
    }

    #[test]
    fn shuffled_contents_are_a_permutation() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let room = BoxRoom::shuffled(&mut rng);
            assert!(BoxRoom::from_contents(room.contents().to_vec()).is_ok());
        }
    }

    #[test]
    fn invalid_contents_are_rejected() {
        let short: Vec<u32> = (1..BOX_COUNT).collect();
        assert!(matches!(
            BoxRoom::from_contents(short),
            Err(Error::InvalidPermutation { expected: BOX_COUNT })
        ));

        let mut duplicated: Vec<u32> = (1..=BOX_COUNT).collect();
        duplicated[0] = 2;
        assert!(BoxRoom::from_contents(duplicated).is_err());

        let mut out_of_range: Vec<u32> = (1..=BOX_COUNT).collect();
        out_of_range[0] = 0;
        assert!(BoxRoom::from_contents(out_of_range).is_err());
    }

    #[test]
    fn longest_cycle_of_identity_is_one() {
        let identity: Vec<u32> = (1..=BOX_COUNT).collect();
        let room = BoxRoom::from_contents(identity).unwrap();
        assert_eq!(room.longest_cycle(), 1);
    }

    #[test]
    fn longest_cycle_of_full_rotation_is_box_count() {
        let room = with_leading_cycle(BOX_COUNT);
        assert_eq!(room.longest_cycle(), BOX_COUNT);
    }

    #[test]
    fn everyone_wins_on_a_cycle_of_exactly_the_open_limit() {
        let room = with_leading_cycle(OPEN_LIMIT);
        assert_eq!(room.longest_cycle(), OPEN_LIMIT);
        let game = Game::with_room(room);
        assert_eq!(game.count_winners().unwrap(), BOX_COUNT);
    }

    #[test]
    fn every_cycle_member_loses_on_a_cycle_one_past_the_open_limit() {
        let room = with_leading_cycle(OPEN_LIMIT + 1);
        assert_eq!(room.longest_cycle(), OPEN_LIMIT + 1);
        let game = Game::with_room(room);

        for number in 1..=OPEN_LIMIT + 1 {
            assert_eq!(game.is_winner(Person::new(number)).unwrap(), false);
        }
        for number in OPEN_LIMIT + 2..=BOX_COUNT {
            assert_eq!(game.is_winner(Person::new(number)).unwrap(), true);
        }
        assert_eq!(
            game.count_winners().unwrap(),
            BOX_COUNT - (OPEN_LIMIT + 1)
        );
    }

    #[test]
    fn all_win_exactly_when_no_cycle_exceeds_the_open_limit() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..200 {
            let game = Game::new(&mut rng);
            let all_won = game.count_winners().unwrap() == BOX_COUNT;
            assert_eq!(all_won, game.room().longest_cycle() <= OPEN_LIMIT);
        }
    }

    #[test]
    fn opening_past_the_limit_is_a_violation() {
        let identity: Vec<u32> = (1..=BOX_COUNT).collect();
        let room = BoxRoom::from_contents(identity).unwrap();
        let mut session = room.session();
        for i in 0..OPEN_LIMIT {
            assert_eq!(session.open(i).unwrap(), i + 1);
        }
        assert_eq!(session.opened(), OPEN_LIMIT);
        assert!(matches!(
            session.open(0),
            Err(Error::OpenLimitExceeded { limit: OPEN_LIMIT })
        ));
    }

    #[test]
    fn out_of_range_box_index_is_rejected() {
        let identity: Vec<u32> = (1..=BOX_COUNT).collect();
        let room = BoxRoom::from_contents(identity).unwrap();
        let mut session = room.session();
        assert!(matches!(
            session.open(BOX_COUNT),
            Err(Error::InvalidBoxIndex)
        ));
    }

    #[test]
    fn chain_strategy_never_trips_the_open_limit() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            let game = Game::new(&mut rng);
            // any Err here would be an OpenLimitExceeded escape
            game.count_winners().unwrap();
        }
    }
}
