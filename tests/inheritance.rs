#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_method in inheritance is OK
        "from Base"
    }

    tests! {
        override_method in inheritance is OK
        "child"
        "base"
    }

    tests! {
        grandparent in inheritance is OK
        "A.hi"
    }

    tests! {
        superclass_must_be_class in inheritance is ERR
        "Superclass must be a class."
        "[line 2]"
    }

    tests! {
        inherit_self in inheritance is ERR
        "[line 1] Error at 'Oops': A class can't inherit from itself."
    }
}
