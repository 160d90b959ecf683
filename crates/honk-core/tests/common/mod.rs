//! Small circuit builder shared by the integration tests
//!
//! Every test threads its own `ChaCha20Rng`, seeded explicitly, through the builder.

#![allow(dead_code)]

use ark_ff::{Field, One, UniformRand, Zero};
use honk_core::entities::Entity;
use honk_core::field::{fr_from_i64, fr_from_u64};
use honk_core::relations::databus::{compute_bus_inverses, BusColumn};
use honk_core::relations::logderiv_lookup::{compute_lookup_inverses, compute_read_counts_and_tags};
use honk_core::relations::permutation::{compute_grand_product, compute_public_input_delta};
use honk_core::{Fr, PedersenIpa, ProvingKey, RelationParameters, Trace};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub const LOG_N: u32 = 5;
pub const PUB_INPUTS_OFFSET: usize = 1;

const WIRES: [Entity; 4] = [Entity::Wl, Entity::Wr, Entity::Wo, Entity::W4];
const SIGMAS: [Entity; 4] = [Entity::Sigma1, Entity::Sigma2, Entity::Sigma3, Entity::Sigma4];

/// Rows used by [`build_circuit`]
pub mod rows {
    pub const MUL_GATE: usize = 3;
    pub const ADD_GATE: usize = 4;
    pub const LOOKUP_READS: [usize; 2] = [5, 6];
    pub const RANGE: [usize; 2] = [7, 8];
    pub const EC_ADD: usize = 10;
    pub const EC_DOUBLE: usize = 12;
    pub const CALLDATA_READ: usize = 14;
    pub const RETURN_DATA_READ: usize = 15;
    pub const TABLE_START: usize = 16;
}

pub fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Commitment setup large enough for every test circuit
pub fn scheme() -> PedersenIpa {
    PedersenIpa::setup(LOG_N, "honk-core/integration")
}

pub struct TestCircuit {
    pub trace: Trace,
    pub public_inputs: Vec<Fr>,
    pub pub_inputs_offset: usize,
}

impl TestCircuit {
    pub fn proving_key(&self) -> ProvingKey {
        ProvingKey::new(
            self.trace.clone(),
            self.public_inputs.clone(),
            self.pub_inputs_offset,
        )
        .unwrap()
    }
}

/// Tie wire cells `(wire, row)` into one copy cycle
pub fn copy_cycle(trace: &mut Trace, cells: &[(usize, usize)]) {
    let n = trace.size();
    let value = trace.get(WIRES[cells[0].0], cells[0].1);
    for (i, &(wire, row)) in cells.iter().enumerate() {
        assert_eq!(trace.get(WIRES[wire], row), value, "copy cycle over unequal values");
        let (next_wire, next_row) = cells[(i + 1) % cells.len()];
        trace.set(SIGMAS[wire], row, fr_from_u64((next_wire * n + next_row) as u64));
    }
}

/// First point on Grumpkin (`y² = x³ − 17`) with `x >= start`, and its x as an integer
pub fn grumpkin_point(start: u64) -> (u64, (Fr, Fr)) {
    let mut x = start;
    loop {
        let xf = fr_from_u64(x);
        if let Some(y) = (xf * xf * xf - fr_from_u64(17)).sqrt() {
            return (x, (xf, y));
        }
        x += 1;
    }
}

fn grumpkin_add(p: (Fr, Fr), q: (Fr, Fr)) -> (Fr, Fr) {
    let lambda = (q.1 - p.1) * (q.0 - p.0).inverse().unwrap();
    let x3 = lambda * lambda - p.0 - q.0;
    (x3, lambda * (p.0 - x3) - p.1)
}

fn grumpkin_double(p: (Fr, Fr)) -> (Fr, Fr) {
    let lambda = fr_from_u64(3) * p.0 * p.0 * (p.1 + p.1).inverse().unwrap();
    let x3 = lambda * lambda - p.0 - p.0;
    (x3, lambda * (p.0 - x3) - p.1)
}

/// A 32-row circuit exercising every relation:
///
/// - two public inputs at rows 1 and 2, each tied from `w_l` to `w_r` by a gate
/// - a mul gate over the public inputs and an add gate over its output, copy-constrained
/// - two XOR lookups into a 2-bit table
/// - a delta range chain
/// - one elliptic addition and one doubling
/// - one calldata read and one return-data read
pub fn build_circuit(rng: &mut ChaCha20Rng) -> TestCircuit {
    let mut trace = Trace::new(LOG_N).unwrap();
    let one = Fr::one();
    let minus_one = fr_from_i64(-1);

    // Public inputs
    let a = Fr::rand(rng);
    let b = Fr::rand(rng);
    let public_inputs = vec![a, b];
    for (j, pi) in public_inputs.iter().enumerate() {
        let row = PUB_INPUTS_OFFSET + j;
        trace.set(Entity::Wl, row, *pi);
        trace.set(Entity::Wr, row, *pi);
        trace.set(Entity::QArith, row, one);
        trace.set(Entity::Ql, row, one);
        trace.set(Entity::Qr, row, minus_one);
        trace.set(Entity::Sigma1, row, fr_from_i64(-((row + 1) as i64)));
    }

    // a·b = c, c + x = d
    let c = a * b;
    let x = Fr::rand(rng);
    let r = rows::MUL_GATE;
    trace.set(Entity::QArith, r, one);
    trace.set(Entity::Qm, r, one);
    trace.set(Entity::Qo, r, minus_one);
    trace.set(Entity::Wl, r, a);
    trace.set(Entity::Wr, r, b);
    trace.set(Entity::Wo, r, c);

    let r = rows::ADD_GATE;
    trace.set(Entity::QArith, r, one);
    trace.set(Entity::Ql, r, one);
    trace.set(Entity::Qr, r, one);
    trace.set(Entity::Qo, r, minus_one);
    trace.set(Entity::Wl, r, c);
    trace.set(Entity::Wr, r, x);
    trace.set(Entity::Wo, r, c + x);

    copy_cycle(&mut trace, &[(1, PUB_INPUTS_OFFSET), (0, rows::MUL_GATE)]);
    copy_cycle(&mut trace, &[(1, PUB_INPUTS_OFFSET + 1), (1, rows::MUL_GATE)]);
    copy_cycle(&mut trace, &[(2, rows::MUL_GATE), (0, rows::ADD_GATE)]);

    // XOR table with id 1
    for (i, (l, r)) in [(0u64, 0u64), (0, 1), (1, 0), (1, 1)].iter().enumerate() {
        let row = rows::TABLE_START + i;
        trace.set(Entity::Table1, row, fr_from_u64(*l));
        trace.set(Entity::Table2, row, fr_from_u64(*r));
        trace.set(Entity::Table3, row, fr_from_u64(l ^ r));
        trace.set(Entity::Table4, row, one);
    }
    for (row, (l, r)) in rows::LOOKUP_READS.iter().zip([(1u64, 0u64), (1, 1)]) {
        set_lookup_read(&mut trace, *row, l, r, l ^ r);
    }

    // Range chain 0, 1, 3, 4 | 5, 6, 6, 8 | 10
    let chain = [[0u64, 1, 3, 4], [5, 6, 6, 8]];
    for (row, values) in rows::RANGE.iter().zip(chain) {
        trace.set(Entity::QDeltaRange, *row, one);
        for (wire, v) in WIRES.iter().zip(values) {
            trace.set(*wire, *row, fr_from_u64(v));
        }
    }
    trace.set(Entity::Wl, rows::RANGE[1] + 1, fr_from_u64(10));

    // Elliptic add (p1 + p2) and double (2·p1)
    let (x1, p1) = grumpkin_point(1);
    let (_, p2) = grumpkin_point(x1 + 1);
    let sum = grumpkin_add(p1, p2);
    let r = rows::EC_ADD;
    trace.set(Entity::QElliptic, r, one);
    trace.set(Entity::Ql, r, one);
    trace.set(Entity::Wr, r, p1.0);
    trace.set(Entity::Wo, r, p1.1);
    trace.set(Entity::Wl, r + 1, p2.0);
    trace.set(Entity::W4, r + 1, p2.1);
    trace.set(Entity::Wr, r + 1, sum.0);
    trace.set(Entity::Wo, r + 1, sum.1);

    let doubled = grumpkin_double(p1);
    let r = rows::EC_DOUBLE;
    trace.set(Entity::QElliptic, r, one);
    trace.set(Entity::Qm, r, one);
    trace.set(Entity::Wr, r, p1.0);
    trace.set(Entity::Wo, r, p1.1);
    trace.set(Entity::Wr, r + 1, doubled.0);
    trace.set(Entity::Wo, r + 1, doubled.1);

    // Data bus
    for i in 0..trace.size() {
        trace.set(Entity::DatabusId, i, fr_from_u64(i as u64));
    }
    for i in 0..4 {
        trace.set(Entity::Calldata, i, Fr::rand(rng));
        trace.set(Entity::ReturnData, i, Fr::rand(rng));
    }
    set_bus_read(&mut trace, BusColumn::Calldata, rows::CALLDATA_READ, 2);
    set_bus_read(&mut trace, BusColumn::ReturnData, rows::RETURN_DATA_READ, 1);

    TestCircuit {
        trace,
        public_inputs,
        pub_inputs_offset: PUB_INPUTS_OFFSET,
    }
}

/// Lookup of `(l, r, o)` in the table with id 1
pub fn set_lookup_read(trace: &mut Trace, row: usize, l: u64, r: u64, o: u64) {
    trace.set(Entity::QLookup, row, Fr::one());
    trace.set(Entity::Qo, row, Fr::one());
    trace.set(Entity::Wl, row, fr_from_u64(l));
    trace.set(Entity::Wr, row, fr_from_u64(r));
    trace.set(Entity::Wo, row, fr_from_u64(o));
}

/// Read entry `index` of a bus column at `row` and credit the read
pub fn set_bus_read(trace: &mut Trace, column: BusColumn, row: usize, index: usize) {
    let value = trace.get(column.values(), index);
    trace.set(Entity::QBusread, row, Fr::one());
    trace.set(column.selector(), row, Fr::one());
    trace.set(Entity::Wl, row, value);
    trace.set(Entity::Wr, row, fr_from_u64(index as u64));
    let count = trace.get(column.read_counts(), index);
    trace.set(column.read_counts(), index, count + Fr::one());
}

/// The 8-row bus trace: calldata written at row 3, read at row 6 with the given index
pub fn bus_circuit(rng: &mut ChaCha20Rng, read_index: u64) -> TestCircuit {
    let mut trace = Trace::new(3).unwrap();
    for i in 0..trace.size() {
        trace.set(Entity::DatabusId, i, fr_from_u64(i as u64));
    }
    let value = Fr::rand(rng);
    trace.set(Entity::Calldata, 3, value);
    trace.set(Entity::CalldataReadCounts, 3, Fr::one());

    trace.set(Entity::QBusread, 6, Fr::one());
    trace.set(Entity::Ql, 6, Fr::one());
    trace.set(Entity::Wl, 6, value);
    trace.set(Entity::Wr, 6, fr_from_u64(read_index));

    TestCircuit {
        trace,
        public_inputs: vec![],
        pub_inputs_offset: 0,
    }
}

/// 8-row trace where rows 5 and 6 both read the same calldata value.
///
/// With `spread` the value is written to entries 2 and 3 and each row reads its own
/// entry. Without it both rows read entry 3, whose read count becomes 2.
pub fn double_read_circuit(rng: &mut ChaCha20Rng, spread: bool) -> TestCircuit {
    let mut trace = Trace::new(3).unwrap();
    for i in 0..trace.size() {
        trace.set(Entity::DatabusId, i, fr_from_u64(i as u64));
    }
    let value = Fr::rand(rng);
    trace.set(Entity::Calldata, 3, value);
    let first = if spread {
        trace.set(Entity::Calldata, 2, value);
        2
    } else {
        3
    };
    set_bus_read(&mut trace, BusColumn::Calldata, 5, first);
    set_bus_read(&mut trace, BusColumn::Calldata, 6, 3);

    TestCircuit {
        trace,
        public_inputs: vec![],
        pub_inputs_offset: 0,
    }
}

/// Fill the derived columns the way the prover does, with fixed challenges
pub fn fill_derived_columns(circuit: &TestCircuit, params: &RelationParameters) -> Trace {
    let mut trace = circuit.trace.clone();
    let (counts, tags) = compute_read_counts_and_tags(&trace);
    trace.set_column(Entity::LookupReadCounts, counts).unwrap();
    trace.set_column(Entity::LookupReadTags, tags).unwrap();

    let inverses = compute_lookup_inverses(&trace, params);
    trace.set_column(Entity::LookupInverses, inverses).unwrap();
    for column in BusColumn::ALL {
        let inverses = compute_bus_inverses(&trace, params, column);
        trace.set_column(column.inverses(), inverses).unwrap();
    }

    let z_perm = compute_grand_product(&trace, params);
    trace.set_column(Entity::ZPerm, z_perm).unwrap();
    trace
}

/// Fixed challenges for trace-level checks
pub fn test_parameters(rng: &mut ChaCha20Rng, circuit: &TestCircuit) -> RelationParameters {
    let beta = Fr::rand(rng);
    let gamma = Fr::rand(rng);
    RelationParameters {
        eta: Fr::rand(rng),
        eta_two: Fr::rand(rng),
        eta_three: Fr::rand(rng),
        beta,
        gamma,
        public_input_delta: compute_public_input_delta(
            &circuit.public_inputs,
            &beta,
            &gamma,
            circuit.pub_inputs_offset as u64,
        ),
    }
}

/// Count nonzero entries of a column
pub fn count_nonzero(column: &[Fr]) -> usize {
    column.iter().filter(|v| !v.is_zero()).count()
}
