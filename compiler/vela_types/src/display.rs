//! Human-readable type rendering for diagnostics.

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Render a type; nominal types resolve their name through the
    /// caller-provided closure (the pool stores declarations, not names).
    pub fn display(&self, idx: Idx, decl_name: &mut dyn FnMut(vela_ir::DeclId) -> String) -> String {
        if idx.is_none() {
            return "{unknown}".to_string();
        }
        if let Some(name) = idx.name() {
            return name.to_string();
        }
        match self.tag(idx) {
            Tag::Mut => format!("mut {}", self.display(self.base(idx), decl_name)),
            Tag::Const => format!("const {}", self.display(self.base(idx), decl_name)),
            Tag::Ptr => format!("*{}", self.display(self.base(idx), decl_name)),
            Tag::Ref => format!("&{}", self.display(self.base(idx), decl_name)),
            Tag::Opt => format!("?{}", self.display(self.base(idx), decl_name)),
            Tag::Array => format!(
                "[{}]{}",
                self.array_len(idx),
                self.display(self.elem_type(idx), decl_name)
            ),
            Tag::Vector => format!(
                "vec[{}]{}",
                self.vector_len(idx),
                self.display(self.elem_type(idx), decl_name)
            ),
            Tag::Matrix => {
                let (rows, cols) = self.matrix_dims(idx);
                format!(
                    "mat[{rows},{cols}]{}",
                    self.display(self.elem_type(idx), decl_name)
                )
            }
            Tag::Fun => {
                let params = self
                    .fun_params(idx)
                    .iter()
                    .map(|&p| self.display(p, decl_name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let vararg = if self.fun_is_vararg(idx) {
                    if params.is_empty() { "..." } else { ", ..." }
                } else {
                    ""
                };
                format!(
                    "fun({params}{vararg}): {}",
                    self.display(self.fun_return(idx), decl_name)
                )
            }
            Tag::Struct | Tag::Union | Tag::Enum => decl_name(self.nominal_decl(idx)),
            // primitives are handled by `Idx::name` above
            _ => "{unknown}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::{CallConv, DeclId};

    fn anon(_: DeclId) -> String {
        "S".to_string()
    }

    #[test]
    fn display_forms() {
        let mut pool = Pool::new();
        let mut name = anon;

        assert_eq!(pool.display(Idx::I32, &mut name), "i32");

        let opt = pool.opt_of(Idx::I32);
        assert_eq!(pool.display(opt, &mut name), "?i32");

        let mut_i32 = pool.mut_of(Idx::I32);
        let ptr = pool.ptr_to(mut_i32);
        assert_eq!(pool.display(ptr, &mut name), "*mut i32");

        let arr = pool.array_of(8, Idx::U8);
        assert_eq!(pool.display(arr, &mut name), "[8]u8");

        let v = pool.vec_of(4, Idx::F32);
        assert_eq!(pool.display(v, &mut name), "vec[4]f32");

        let f = pool.fun_of(Idx::UNIT, &[Idx::I32, Idx::BOOL], true, CallConv::Cdecl);
        assert_eq!(pool.display(f, &mut name), "fun(i32, bool, ...): unit");

        let s = pool.struct_of(DeclId::from_raw(3), &[Idx::I32]);
        assert_eq!(pool.display(s, &mut name), "S");
    }
}
