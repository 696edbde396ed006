//! Material values shared by the evaluator and move ordering.

use shakmaty::Role;

/// Centipawn value of each role, indexed by [`role_index`].
///
/// | Role   | Value |
/// |--------|-------|
/// | Pawn   | 100   |
/// | Knight | 280   |
/// | Bishop | 320   |
/// | Rook   | 479   |
/// | Queen  | 929   |
/// | King   | 0     |
pub const PIECE_VALUES: [i32; 6] = [100, 280, 320, 479, 929, 0];

/// Table index of a role: pawn 0 through king 5.
pub const fn role_index(role: Role) -> usize {
    match role {
        Role::Pawn => 0,
        Role::Knight => 1,
        Role::Bishop => 2,
        Role::Rook => 3,
        Role::Queen => 4,
        Role::King => 5,
    }
}

/// Centipawn value of a role.
pub const fn piece_value(role: Role) -> i32 {
    PIECE_VALUES[role_index(role)]
}

/// Ordinal strength used to compare victim and attacker: pawn 1 through king 6.
pub const fn role_rank(role: Role) -> i32 {
    role_index(role) as i32 + 1
}

/// Material gained by promoting a pawn to `role`.
pub const fn promotion_gain(role: Role) -> i32 {
    piece_value(role) - piece_value(Role::Pawn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_ascend_except_king() {
        assert!(piece_value(Role::Pawn) < piece_value(Role::Knight));
        assert!(piece_value(Role::Knight) < piece_value(Role::Bishop));
        assert!(piece_value(Role::Bishop) < piece_value(Role::Rook));
        assert!(piece_value(Role::Rook) < piece_value(Role::Queen));
        assert_eq!(piece_value(Role::King), 0);
    }

    #[test]
    fn queen_promotion_gain() {
        assert_eq!(promotion_gain(Role::Queen), 829);
    }

    #[test]
    fn ranks_order_roles() {
        assert_eq!(role_rank(Role::Pawn), 1);
        assert_eq!(role_rank(Role::King), 6);
    }
}
