#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        uninitialized in variable is OK
        "nil"
    }

    tests! {
        redefine_global in variable is OK
        "2"
    }

    tests! {
        shadow in variable is OK
        "shadow"
        "global"
    }

    tests! {
        late_global in variable is OK
        "first"
        "second"
    }

    tests! {
        undefined in variable is ERR
        "Undefined variable 'notDefined'."
        "[line 1]"
    }

    tests! {
        undefined_assign in variable is ERR
        "Undefined variable 'a'."
        "[line 1]"
    }

    tests! {
        use_in_initializer in variable is ERR
        "[line 3] Error at 'a': Can't read local variable in its own initializer."
    }

    tests! {
        already_defined in variable is ERR
        "[line 4] Error at 'a': Already a variable with this name in this scope."
        "[line 4] Warning at 'a': Unused variable."
    }

    tests! {
        unused in variable is WARN
        "[line 2] Warning at 'unused': Unused variable."
    }
}
