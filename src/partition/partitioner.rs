pub type PartitionId = u32;

/// Seed for partition hashing. Changing it reshuffles every name onto a new partition.
pub const PARTITION_HASH_SEED: u32 = 0x0100_0193;

/// Maps distributed object names onto the fixed partition space.
///
/// Ownership of partitions by members is computed elsewhere; this type only answers
/// "which partition holds this name". The mapping is part of the protocol: clients
/// compute it too, so it must not depend on the build or the process.
#[derive(Debug, Clone)]
pub struct PartitionManager {
    num_partitions: u32,
}

impl PartitionManager {
    pub fn new(num_partitions: u32) -> Self {
        assert!(num_partitions > 0, "partition count must be positive");
        Self { num_partitions }
    }

    pub fn partition_count(&self) -> u32 {
        self.num_partitions
    }

    /// Partition owning `name`: murmur3 of its UTF-8 bytes, taken as a signed 32-bit
    /// value, absolute value modulo the partition count.
    pub fn get_partition(&self, name: &str) -> PartitionId {
        let hash = murmur3_32(name.as_bytes(), PARTITION_HASH_SEED) as i32;
        if hash == i32::MIN {
            return 0;
        }
        hash.unsigned_abs() % self.num_partitions
    }

    pub fn contains(&self, partition: PartitionId) -> bool {
        partition < self.num_partitions
    }
}

/// MurmurHash3, x86 32-bit variant.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix(k, C1, C2);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let k = tail
            .iter()
            .rev()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
        h ^= mix(k, C1, C2);
    }

    h ^= data.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

fn mix(k: u32, c1: u32, c2: u32) -> u32 {
    k.wrapping_mul(c1).rotate_left(15).wrapping_mul(c2)
}
